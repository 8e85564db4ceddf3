//! Draft builder: turns one pointer gesture into a candidate scene.
//!
//! A draft is a private copy of the committed scene plus the shape being
//! drawn. Pointer moves mutate it in place, so however many moves a gesture
//! produces, history only sees the single scene handed over on release.

use crate::scene::{Scene, SceneError};
use crate::shapes::{Circle, Rectangle, SerializableColor, Shape, ShapeId};
use crate::tools::ToolKind;
use kurbo::Point;
use thiserror::Error;

/// Draft builder errors. All are caller contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Tool {0:?} does not draw shapes")]
    InvalidTool(ToolKind),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// An in-progress, uncommitted scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    scene: Scene,
}

impl Draft {
    /// The candidate scene to render while the gesture is active.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

/// Start a gesture: copy `committed` and add a zero-extent shape at `anchor`.
pub fn begin_draft(
    committed: &Scene,
    tool: ToolKind,
    anchor: Point,
    fill: SerializableColor,
) -> Result<(Draft, ShapeId), DraftError> {
    let shape: Shape = match tool {
        ToolKind::Rectangle => Rectangle::new(anchor, 0.0, 0.0, fill).into(),
        ToolKind::Circle => Circle::new(anchor, 0.0, fill).into(),
        ToolKind::Select => return Err(DraftError::InvalidTool(tool)),
    };
    let id = shape.id();

    let mut scene = committed.clone();
    scene.add_shape(shape)?;
    log::debug!("Began {:?} draft {} at ({}, {})", tool, id, anchor.x, anchor.y);
    Ok((Draft { scene }, id))
}

/// Resize the tracked shape so it reaches `current`.
///
/// Rectangles take the signed offset from their anchor; circles take the
/// Euclidean distance. Every other shape in the draft is left untouched.
pub fn update_draft(
    mut draft: Draft,
    tool: ToolKind,
    shape_id: ShapeId,
    current: Point,
) -> Result<Draft, DraftError> {
    match tool {
        ToolKind::Rectangle => draft.scene.rectangle_mut(shape_id)?.resize_to(current),
        ToolKind::Circle => draft.scene.circle_mut(shape_id)?.resize_to(current),
        ToolKind::Select => return Err(DraftError::InvalidTool(tool)),
    }
    Ok(draft)
}

/// End the gesture and hand the scene over for commit.
pub fn finish_draft(draft: Draft) -> Scene {
    draft.scene
}
