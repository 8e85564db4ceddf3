//! Shape definitions for the drawing surface.

mod arrow;
mod circle;
mod rectangle;
mod scribble;

pub use arrow::{Arrow, ArrowPatch};
pub use circle::{Circle, CirclePatch};
pub use rectangle::{Rectangle, RectanglePatch};
pub use scribble::{Scribble, ScribblePatch};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Error returned when a color string is not a supported hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8).
///
/// Persisted as a CSS-style hex string, `#rrggbb` when opaque and
/// `#rrggbbaa` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn red() -> Self {
        Self::rgb(255, 0, 0)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::red()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_string()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Discriminant for the four shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Arrow,
    Scribble,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Scribble => "scribble",
        };
        f.write_str(name)
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the anchor coordinate.
    fn anchor(&self) -> Point;

    /// Get the fill color.
    fn fill(&self) -> SerializableColor;

    /// Get the normalized bounding box.
    fn bounds(&self) -> Rect;
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Arrow(Arrow),
    Scribble(Scribble),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Scribble(_) => ShapeKind::Scribble,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_shape_ref().id()
    }

    pub fn bounds(&self) -> Rect {
        self.as_shape_ref().bounds()
    }

    /// Borrow this shape as a [`ShapeRef`].
    pub fn as_shape_ref(&self) -> ShapeRef<'_> {
        match self {
            Shape::Rectangle(s) => ShapeRef::Rectangle(s),
            Shape::Circle(s) => ShapeRef::Circle(s),
            Shape::Arrow(s) => ShapeRef::Arrow(s),
            Shape::Scribble(s) => ShapeRef::Scribble(s),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(shape: Rectangle) -> Self {
        Shape::Rectangle(shape)
    }
}

impl From<Circle> for Shape {
    fn from(shape: Circle) -> Self {
        Shape::Circle(shape)
    }
}

impl From<Arrow> for Shape {
    fn from(shape: Arrow) -> Self {
        Shape::Arrow(shape)
    }
}

impl From<Scribble> for Shape {
    fn from(shape: Scribble) -> Self {
        Shape::Scribble(shape)
    }
}

/// Borrowed view of a shape stored in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeRef<'a> {
    Rectangle(&'a Rectangle),
    Circle(&'a Circle),
    Arrow(&'a Arrow),
    Scribble(&'a Scribble),
}

impl<'a> ShapeRef<'a> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeRef::Rectangle(_) => ShapeKind::Rectangle,
            ShapeRef::Circle(_) => ShapeKind::Circle,
            ShapeRef::Arrow(_) => ShapeKind::Arrow,
            ShapeRef::Scribble(_) => ShapeKind::Scribble,
        }
    }

    fn as_trait(&self) -> &'a dyn ShapeTrait {
        match *self {
            ShapeRef::Rectangle(s) => s,
            ShapeRef::Circle(s) => s,
            ShapeRef::Arrow(s) => s,
            ShapeRef::Scribble(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_trait().id()
    }

    pub fn anchor(&self) -> Point {
        self.as_trait().anchor()
    }

    pub fn fill(&self) -> SerializableColor {
        self.as_trait().fill()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }
}

/// A partial update for one shape; the variant names the sequence it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePatch {
    Rectangle(RectanglePatch),
    Circle(CirclePatch),
    Arrow(ArrowPatch),
    Scribble(ScribblePatch),
}

impl ShapePatch {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapePatch::Rectangle(_) => ShapeKind::Rectangle,
            ShapePatch::Circle(_) => ShapeKind::Circle,
            ShapePatch::Arrow(_) => ShapeKind::Arrow,
            ShapePatch::Scribble(_) => ShapeKind::Scribble,
        }
    }
}

/// Iterate a flat `[x0, y0, x1, y1, ...]` list as points. A trailing odd value is ignored.
pub fn point_pairs(flat: &[f64]) -> impl Iterator<Item = Point> + '_ {
    flat.chunks_exact(2).map(|pair| Point::new(pair[0], pair[1]))
}

/// Bounding box of a flat point list offset by an anchor.
pub(crate) fn polyline_bounds(anchor: Point, flat: &[f64]) -> Rect {
    let mut points = point_pairs(flat).map(|p| p + anchor.to_vec2());
    match points.next() {
        Some(first) => points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)),
        None => Rect::from_points(anchor, anchor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_forms() {
        assert_eq!(SerializableColor::from_hex("#ff0000"), Some(SerializableColor::red()));
        assert_eq!(SerializableColor::from_hex("#f00"), Some(SerializableColor::red()));
        assert_eq!(
            SerializableColor::from_hex("#11223344"),
            Some(SerializableColor::new(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(SerializableColor::from_hex("ff0000"), None);
        assert_eq!(SerializableColor::from_hex("#ff00"), None);
        assert_eq!(SerializableColor::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(SerializableColor::red().to_string(), "#ff0000");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_color_serializes_as_string() {
        let json = serde_json::to_string(&SerializableColor::rgb(0, 128, 255)).unwrap();
        assert_eq!(json, "\"#0080ff\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SerializableColor::rgb(0, 128, 255));
        assert!(serde_json::from_str::<SerializableColor>("\"red\"").is_err());
    }

    #[test]
    fn test_color_peniko_conversion() {
        let color = SerializableColor::new(10, 20, 30, 200);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
    }

    #[test]
    fn test_point_pairs_ignores_trailing_value() {
        let points: Vec<Point> = point_pairs(&[1.0, 2.0, 3.0, 4.0, 5.0]).collect();
        assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }
}
