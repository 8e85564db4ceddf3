//! Rectangle shape.

use super::{SerializableColor, ShapeId, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle anchored at one corner.
///
/// Width and height are signed: a negative extent grows left/up from the
/// anchor, which is what a drag back past the starting point produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Anchor corner x.
    pub x: f64,
    /// Anchor corner y.
    pub y: f64,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Fill color.
    pub fill: SerializableColor,
}

/// Field overrides for [`Rectangle`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectanglePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<SerializableColor>,
}

impl Rectangle {
    /// Create a new rectangle with a fresh id.
    pub fn new(anchor: Point, width: f64, height: f64, fill: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: anchor.x,
            y: anchor.y,
            width,
            height,
            fill,
        }
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Stretch the rectangle so its far corner sits at `corner`.
    pub fn resize_to(&mut self, corner: Point) {
        self.width = corner.x - self.x;
        self.height = corner.y - self.y;
    }

    /// Merge a patch into this rectangle.
    pub fn apply(&mut self, patch: &RectanglePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
    }
}

impl ShapeTrait for Rectangle {
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
        self.as_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0, SerializableColor::red());
        assert!((rect.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_to_is_signed() {
        let mut rect = Rectangle::new(Point::new(10.0, 10.0), 0.0, 0.0, SerializableColor::red());
        rect.resize_to(Point::new(50.0, 30.0));
        assert_eq!((rect.width, rect.height), (40.0, 20.0));
        rect.resize_to(Point::new(0.0, 0.0));
        assert_eq!((rect.width, rect.height), (-10.0, -10.0));
    }

    #[test]
    fn test_bounds_normalize_negative_extent() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), -10.0, -5.0, SerializableColor::red());
        assert_eq!(rect.bounds(), Rect::new(0.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 5.0, 5.0, SerializableColor::red());
        let id = rect.id();
        rect.apply(&RectanglePatch {
            x: Some(3.0),
            height: Some(9.0),
            ..Default::default()
        });
        assert_eq!(rect.id(), id);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (3.0, 0.0, 5.0, 9.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let rect = Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0, SerializableColor::red());
        let value = serde_json::to_value(&rect).unwrap();
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["width"], 3.0);
        assert_eq!(value["fill"], "#ff0000");
        assert_eq!(value["id"], rect.id().to_string());
    }
}
