//! Freehand scribble shape.

use super::{SerializableColor, ShapeId, ShapeTrait, point_pairs, polyline_bounds};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke sampled from a drag.
///
/// `points` is a flat `[x0, y0, x1, y1, ...]` list relative to the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scribble {
    pub(crate) id: ShapeId,
    /// Anchor x.
    pub x: f64,
    /// Anchor y.
    pub y: f64,
    /// Flat list of coordinate pairs, relative to the anchor.
    pub points: Vec<f64>,
    pub fill: SerializableColor,
}

/// Field overrides for [`Scribble`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScribblePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Option<Vec<f64>>,
    pub fill: Option<SerializableColor>,
}

impl Scribble {
    /// Create an empty scribble anchored at `anchor`.
    pub fn new(anchor: Point, fill: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: anchor.x,
            y: anchor.y,
            points: Vec::new(),
            fill,
        }
    }

    /// Create from world-space samples; the first sample becomes the anchor.
    pub fn from_points(samples: &[Point], fill: SerializableColor) -> Self {
        let anchor = samples.first().copied().unwrap_or(Point::ZERO);
        let mut scribble = Self::new(anchor, fill);
        for &sample in samples {
            scribble.add_point(sample);
        }
        scribble
    }

    /// Append a world-space sample.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point.x - self.x);
        self.points.push(point.y - self.y);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    /// Iterate the samples in world coordinates.
    pub fn points_iter(&self) -> impl Iterator<Item = Point> + '_ {
        let offset = Vec2::new(self.x, self.y);
        point_pairs(&self.points).map(move |p| p + offset)
    }

    /// Merge a patch into this scribble.
    pub fn apply(&mut self, patch: &ScribblePatch) {
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

impl ShapeTrait for Scribble {
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
