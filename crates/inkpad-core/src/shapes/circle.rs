//! Circle shape.

use super::{SerializableColor, ShapeId, ShapeTrait};
use kurbo::{Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle centered on its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Radius (never negative).
    pub radius: f64,
    /// Fill color.
    pub fill: SerializableColor,
}

/// Field overrides for [`Circle`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CirclePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub radius: Option<f64>,
    pub fill: Option<SerializableColor>,
}

impl Circle {
    /// Create a new circle with a fresh id.
    pub fn new(center: Point, radius: f64, fill: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: center.x,
            y: center.y,
            radius: radius.abs(),
            fill,
        }
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(Point::new(self.x, self.y), self.radius)
    }

    /// Grow the radius to reach `edge`.
    pub fn resize_to(&mut self, edge: Point) {
        self.radius = (edge.x - self.x).hypot(edge.y - self.y);
    }

    /// Merge a patch into this circle. Negative radii are stored as their magnitude.
    pub fn apply(&mut self, patch: &CirclePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(radius) = patch.radius {
            self.radius = radius.abs();
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn fill(&self) -> SerializableColor {
        self.fill
    }

    fn bounds(&self) -> Rect {
        self.as_kurbo().bounding_box()
    }
}
