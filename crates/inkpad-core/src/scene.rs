//! The scene: every shape currently on the canvas.

use crate::shapes::{
    Arrow, Circle, Rectangle, Scribble, Shape, ShapeId, ShapeKind, ShapePatch, ShapeRef,
    ShapeTrait,
};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Scene model errors. Both indicate a broken caller contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Shape id {0} already exists in the scene")]
    DuplicateId(ShapeId),
    #[error("No {kind} with id {id} in the scene")]
    ShapeNotFound { id: ShapeId, kind: ShapeKind },
    #[error("{kind} {id} has an odd number of point coordinates")]
    MalformedPoints { id: ShapeId, kind: ShapeKind },
}

/// Immutable snapshot of all shapes, one ordered sequence per variant.
///
/// Order within each sequence is render order. Ids are unique across all
/// four sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub rectangles: Vec<Rectangle>,
    pub circles: Vec<Circle>,
    pub arrows: Vec<Arrow>,
    pub scribbles: Vec<Scribble>,
}

impl Scene {
    /// The all-empty scene.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return a new scene with `shape` appended to its variant's sequence.
    pub fn with_shape_added(&self, shape: impl Into<Shape>) -> Result<Scene, SceneError> {
        let mut scene = self.clone();
        scene.add_shape(shape.into())?;
        Ok(scene)
    }

    /// Return a new scene with the patch merged into the shape `id`.
    ///
    /// Only the sequence named by the patch variant is searched.
    pub fn with_shape_updated(&self, id: ShapeId, patch: &ShapePatch) -> Result<Scene, SceneError> {
        let mut scene = self.clone();
        scene.update_shape(id, patch)?;
        Ok(scene)
    }

    /// In-place append. Only the draft builder mutates a scene it owns.
    pub(crate) fn add_shape(&mut self, shape: Shape) -> Result<(), SceneError> {
        let id = shape.id();
        if self.contains(id) {
            return Err(SceneError::DuplicateId(id));
        }
        match shape {
            Shape::Rectangle(s) => self.rectangles.push(s),
            Shape::Circle(s) => self.circles.push(s),
            Shape::Arrow(s) => self.arrows.push(s),
            Shape::Scribble(s) => self.scribbles.push(s),
        }
        Ok(())
    }

    /// In-place patch of one shape.
    pub(crate) fn update_shape(&mut self, id: ShapeId, patch: &ShapePatch) -> Result<(), SceneError> {
        let not_found = || SceneError::ShapeNotFound { id, kind: patch.kind() };
        match patch {
            ShapePatch::Rectangle(p) => find_mut(&mut self.rectangles, id).ok_or_else(not_found)?.apply(p),
            ShapePatch::Circle(p) => find_mut(&mut self.circles, id).ok_or_else(not_found)?.apply(p),
            ShapePatch::Arrow(p) => find_mut(&mut self.arrows, id).ok_or_else(not_found)?.apply(p),
            ShapePatch::Scribble(p) => find_mut(&mut self.scribbles, id).ok_or_else(not_found)?.apply(p),
        }
        Ok(())
    }

    pub(crate) fn rectangle_mut(&mut self, id: ShapeId) -> Result<&mut Rectangle, SceneError> {
        find_mut(&mut self.rectangles, id).ok_or(SceneError::ShapeNotFound {
            id,
            kind: ShapeKind::Rectangle,
        })
    }

    pub(crate) fn circle_mut(&mut self, id: ShapeId) -> Result<&mut Circle, SceneError> {
        find_mut(&mut self.circles, id).ok_or(SceneError::ShapeNotFound {
            id,
            kind: ShapeKind::Circle,
        })
    }

    /// Iterate all shapes in render order: rectangles, circles, arrows, scribbles.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeRef<'_>> {
        self.rectangles
            .iter()
            .map(ShapeRef::Rectangle)
            .chain(self.circles.iter().map(ShapeRef::Circle))
            .chain(self.arrows.iter().map(ShapeRef::Arrow))
            .chain(self.scribbles.iter().map(ShapeRef::Scribble))
    }

    /// Get a shape by id.
    pub fn get(&self, id: ShapeId) -> Option<ShapeRef<'_>> {
        self.shapes().find(|s| s.id() == id)
    }

    /// Check whether any sequence holds `id`.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Total number of shapes.
    pub fn len(&self) -> usize {
        self.rectangles.len() + self.circles.len() + self.arrows.len() + self.scribbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes()
            .map(|s| s.bounds())
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Check the invariants a decoded scene must hold.
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut seen = HashSet::with_capacity(self.len());
        for shape in self.shapes() {
            if !seen.insert(shape.id()) {
                return Err(SceneError::DuplicateId(shape.id()));
            }
        }
        let odd_arrow = self.arrows.iter().find(|a| a.points.len() % 2 != 0);
        if let Some(arrow) = odd_arrow {
            return Err(SceneError::MalformedPoints { id: arrow.id(), kind: ShapeKind::Arrow });
        }
        let odd_scribble = self.scribbles.iter().find(|s| s.points.len() % 2 != 0);
        if let Some(scribble) = odd_scribble {
            return Err(SceneError::MalformedPoints { id: scribble.id(), kind: ShapeKind::Scribble });
        }
        Ok(())
    }
}

fn find_mut<T: ShapeTrait>(shapes: &mut [T], id: ShapeId) -> Option<&mut T> {
    shapes.iter_mut().find(|s| s.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{CirclePatch, RectanglePatch, SerializableColor};
    use kurbo::Point;

    fn red() -> SerializableColor {
        SerializableColor::red()
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::empty();
        assert!(scene.is_empty());
        assert!(scene.bounds().is_none());
    }

    #[test]
    fn test_add_shape_returns_new_scene() {
        let scene = Scene::empty();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0, red());
        let id = rect.id();

        let next = scene.with_shape_added(rect).unwrap();
        assert!(scene.is_empty());
        assert_eq!(next.rectangles.len(), 1);
        assert!(next.contains(id));
    }

    #[test]
    fn test_duplicate_id_across_sequences() {
        let rect = Rectangle::new(Point::ZERO, 1.0, 1.0, red());
        let mut circle = Circle::new(Point::ZERO, 1.0, red());
        circle.id = rect.id();

        let scene = Scene::empty().with_shape_added(rect.clone()).unwrap();
        assert_eq!(
            scene.with_shape_added(rect.clone()),
            Err(SceneError::DuplicateId(rect.id()))
        );
        assert_eq!(scene.with_shape_added(circle), Err(SceneError::DuplicateId(rect.id())));
    }

    #[test]
    fn test_update_shape() {
        let rect = Rectangle::new(Point::new(1.0, 1.0), 1.0, 1.0, red());
        let id = rect.id();
        let scene = Scene::empty().with_shape_added(rect).unwrap();

        let patch = ShapePatch::Rectangle(RectanglePatch {
            width: Some(7.0),
            ..Default::default()
        });
        let updated = scene.with_shape_updated(id, &patch).unwrap();
        assert_eq!(updated.rectangles[0].width, 7.0);
        assert_eq!(scene.rectangles[0].width, 1.0);
    }

    #[test]
    fn test_update_searches_only_named_sequence() {
        let rect = Rectangle::new(Point::ZERO, 1.0, 1.0, red());
        let id = rect.id();
        let scene = Scene::empty().with_shape_added(rect).unwrap();

        let patch = ShapePatch::Circle(CirclePatch::default());
        assert_eq!(
            scene.with_shape_updated(id, &patch),
            Err(SceneError::ShapeNotFound { id, kind: ShapeKind::Circle })
        );
    }

    #[test]
    fn test_render_order() {
        let scribble = Scribble::new(Point::ZERO, red());
        let circle = Circle::new(Point::ZERO, 1.0, red());
        let rect = Rectangle::new(Point::ZERO, 1.0, 1.0, red());
        let scene = Scene::empty()
            .with_shape_added(scribble)
            .and_then(|s| s.with_shape_added(circle))
            .and_then(|s| s.with_shape_added(rect))
            .unwrap();

        let kinds: Vec<ShapeKind> = scene.shapes().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Scribble]);
    }

    #[test]
    fn test_bounds_union() {
        let scene = Scene::empty()
            .with_shape_added(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0, red()))
            .and_then(|s| s.with_shape_added(Circle::new(Point::new(20.0, 20.0), 5.0, red())))
            .unwrap();
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 25.0, 25.0)));
    }

    #[test]
    fn test_validate_rejects_odd_points() {
        let mut arrow = Arrow::new(Point::ZERO, vec![0.0, 0.0, 1.0], red());
        let scene = Scene {
            arrows: vec![arrow.clone()],
            ..Scene::default()
        };
        assert!(matches!(scene.validate(), Err(SceneError::MalformedPoints { .. })));

        arrow.points.push(1.0);
        let scene = Scene {
            arrows: vec![arrow],
            ..Scene::default()
        };
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_serialized_layout() {
        let json = serde_json::to_value(Scene::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rectangles": [], "circles": [], "arrows": [], "scribbles": []})
        );
    }
}
