//! Arrow shape.

use super::{SerializableColor, ShapeId, ShapeTrait, point_pairs, polyline_bounds};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A polyline ending in an arrowhead.
///
/// `points` is a flat `[x0, y0, x1, y1, ...]` list relative to the anchor;
/// the head sits on the last point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Flat list of coordinate pairs, relative to the anchor.
    pub points: Vec<f64>,
    /// Fill color (used for the head).
    pub fill: SerializableColor,
}

/// Field overrides for [`Arrow`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrowPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Option<Vec<f64>>,
    pub fill: Option<SerializableColor>,
}

impl Arrow {
    /// Create a new arrow with a fresh id.
    pub fn new(anchor: Point, points: Vec<f64>, fill: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: anchor.x,
            y: anchor.y,
            points,
            fill,
        }
    }

    /// Create a straight arrow from `start` to `end` (world coordinates).
    pub fn between(start: Point, end: Point, fill: SerializableColor) -> Self {
        let tip = end - start;
        Self::new(start, vec![0.0, 0.0, tip.x, tip.y], fill)
    }

    /// Iterate the polyline in world coordinates.
    pub fn points_iter(&self) -> impl Iterator<Item = Point> + '_ {
        let offset = Vec2::new(self.x, self.y);
        point_pairs(&self.points).map(move |p| p + offset)
    }

    /// The final segment `(from, tip)`, if the polyline has at least two points.
    pub fn head_segment(&self) -> Option<(Point, Point)> {
        let points: Vec<Point> = self.points_iter().collect();
        match points.as_slice() {
            [.., from, tip] => Some((*from, *tip)),
            _ => None,
        }
    }

    /// Merge a patch into this arrow.
    pub fn apply(&mut self, patch: &ArrowPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(points) = &patch.points {
            self.points.clone_from(points);
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
    }
}

impl ShapeTrait for Arrow {
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
        polyline_bounds(self.anchor(), &self.points)
    }
}
