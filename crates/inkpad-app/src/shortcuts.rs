//! Keyboard shortcut and tool documentation.

use inkpad_core::{Shortcut, ToolKind};

/// Help text for everything the session responds to.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> &'static [Shortcut] {
        Shortcut::all()
    }

    /// Help lines: shortcuts first, then tools.
    pub fn lines() -> Vec<String> {
        let mut lines: Vec<String> = Self::all()
            .iter()
            .map(|s| format!("  {:20} {} (Cmd on macOS)", s.format(), s.description))
            .collect();
        let tools: Vec<String> = ToolKind::all()
            .iter()
            .map(|t| format!("{:?}", t).to_lowercase())
            .collect();
        lines.push(format!("  {:20} {}", "Tools", tools.join(", ")));
        lines
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for line in Self::lines() {
            println!("{}", line);
        }
        println!();
    }
}
