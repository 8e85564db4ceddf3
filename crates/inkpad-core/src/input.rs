//! Input event types and keyboard shortcut matching.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd (meta) on macOS.
    pub fn platform(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// A key pressed with the platform modifier held.
    pub fn platform(key: impl Into<String>) -> Self {
        Self::new(
            key,
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        )
    }
}

/// Whether the controller consumed a key event.
///
/// `Claimed` means the host must suppress the platform's default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Claimed(ShortcutAction),
    Ignored,
}

impl KeyOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, KeyOutcome::Claimed(_))
    }
}

/// Actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    Undo,
    Redo,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: ShortcutAction, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    /// All registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        const SHORTCUTS: &[Shortcut] = &[
            Shortcut::new("Z", ShortcutAction::Undo, "Undo"),
            Shortcut::new("Y", ShortcutAction::Redo, "Redo"),
        ];
        SHORTCUTS
    }

    /// Platform modifier held, shift not held, key matches case-insensitively.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.modifiers.platform()
            && !event.modifiers.shift
            && event.key.eq_ignore_ascii_case(self.key)
    }

    /// Find the action bound to a key event.
    pub fn lookup(event: &KeyEvent) -> Option<ShortcutAction> {
        Self::all().iter().find(|s| s.matches(event)).map(|s| s.action)
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        format!("Ctrl+{}", self.key)
    }
}
