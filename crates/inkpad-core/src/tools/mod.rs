//! Tool system for the drawing surface.

use crate::draft::{Draft, DraftError, begin_draft, finish_draft, update_draft};
use crate::scene::Scene;
use crate::shapes::{SerializableColor, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
///
/// Arrows and scribbles exist in the scene model but no tool draws them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
}

impl ToolKind {
    /// Whether pointer gestures with this tool create shapes.
    pub fn draws(self) -> bool {
        !matches!(self, ToolKind::Select)
    }

    /// All tools, in toolbar order.
    pub fn all() -> [ToolKind; 3] {
        [ToolKind::Select, ToolKind::Rectangle, ToolKind::Circle]
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A shape is being drawn.
    Drafting {
        /// Tool the gesture started with.
        tool: ToolKind,
        /// Shape created on pointer-down.
        shape_id: ShapeId,
        /// Candidate scene holding the shape.
        draft: Draft,
    },
}

/// Manages the current tool, fill color and the in-progress gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Fill color for new shapes.
    pub fill: SerializableColor,
    /// Current state of the tool.
    state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager with a starting fill color.
    pub fn with_fill(fill: SerializableColor) -> Self {
        Self {
            fill,
            ..Self::default()
        }
    }

    /// Set the current tool. Callers resolve any active gesture first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        debug_assert!(!self.is_active(), "tool switched with a pending draft");
        self.current_tool = tool;
    }

    /// Begin a gesture at `point`. Returns false if the current tool does not draw.
    pub fn begin(&mut self, committed: &Scene, point: Point) -> Result<bool, DraftError> {
        if !self.current_tool.draws() {
            return Ok(false);
        }
        let (draft, shape_id) = begin_draft(committed, self.current_tool, point, self.fill)?;
        self.state = ToolState::Drafting {
            tool: self.current_tool,
            shape_id,
            draft,
        };
        Ok(true)
    }

    /// Track the pointer. Returns false when no gesture is active.
    ///
    /// A failed update discards the gesture.
    pub fn update(&mut self, point: Point) -> Result<bool, DraftError> {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => Ok(false),
            ToolState::Drafting { tool, shape_id, draft } => {
                let draft = update_draft(draft, tool, shape_id, point)?;
                self.state = ToolState::Drafting { tool, shape_id, draft };
                Ok(true)
            }
        }
    }

    /// End the gesture and return the scene to commit.
    pub fn end(&mut self) -> Option<Scene> {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => None,
            ToolState::Drafting { draft, .. } => Some(finish_draft(draft)),
        }
    }

    /// Cancel the current gesture without producing a scene.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a gesture is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Drafting { .. })
    }

    /// The candidate scene for the active gesture.
    pub fn preview(&self) -> Option<&Scene> {
        match &self.state {
            ToolState::Drafting { draft, .. } => Some(draft.scene()),
            ToolState::Idle => None,
        }
    }
}
