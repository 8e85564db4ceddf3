//! Input scripts: recorded user actions replayed against a session.
//!
//! A script is a JSON array of steps, e.g.
//!
//! ```json
//! [
//!   {"action": "tool", "tool": "rectangle"},
//!   {"action": "down", "x": 10, "y": 10},
//!   {"action": "move", "x": 50, "y": 30},
//!   {"action": "up", "x": 50, "y": 30},
//!   {"action": "key", "key": "z", "modifiers": {"ctrl": true}}
//! ]
//! ```

use crate::error::AppError;
use inkpad_core::{Modifiers, SerializableColor, ShapeId, ToolKind};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Tool { tool: ToolKind },
    Fill { color: SerializableColor },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Undo,
    Redo,
    /// Click a shape in select mode.
    Select { id: ShapeId },
    /// Drag a shape so its anchor lands on `(x, y)`.
    MoveShape { id: ShapeId, x: f64, y: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(AppError::Script)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
