//! CPU rasterizer built on `vello_cpu`.
//!
//! Scenes are drawn with antialiased fills and strokes, then read back as a
//! [`Frame`] of straight-alpha RGBA8 pixels ready for PNG encoding.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use inkpad_core::scene::Scene;
use inkpad_core::shapes::{SerializableColor, ShapeRef};
use inkpad_core::surface::Surface;
use kurbo::{Point, Size};
use peniko::Color;
use vello_cpu::color::{AlphaColor, PremulRgba8, Srgb};
use vello_cpu::kurbo::{self as vk, Affine, BezPath, Cap, Join, Shape as _, Stroke};
use vello_cpu::{Pixmap, RenderContext as CpuContext};

/// Outline color for every shape.
const STROKE_COLOR: SerializableColor = SerializableColor::black();
/// Outline width in canvas units.
const STROKE_WIDTH: f64 = 2.0;
/// Arrowhead length and base width in canvas units.
const ARROW_HEAD_LENGTH: f64 = 10.0;
const ARROW_HEAD_WIDTH: f64 = 10.0;
/// Flattening tolerance for curves.
const TOLERANCE: f64 = 0.1;

fn paint(color: SerializableColor) -> AlphaColor<Srgb> {
    AlphaColor::from_rgba8(color.r, color.g, color.b, color.a)
}

fn vk_point(p: Point) -> vk::Point {
    vk::Point::new(p.x, p.y)
}

fn vk_rect(r: kurbo::Rect) -> vk::Rect {
    vk::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn unpremultiply(p: PremulRgba8) -> [u8; 4] {
    if p.a == 0 {
        return [0, 0, 0, 0];
    }
    let a = p.a as u32;
    let channel = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
    [channel(p.r), channel(p.g), channel(p.b), p.a]
}

/// A rendered frame: row-major, straight-alpha RGBA8.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a transparent frame. Zero-sized frames, and frames too large for
    /// the rasterizer, are rejected.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        device_size(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    fn from_pixmap(pixmap: &Pixmap, width: u32, height: u32) -> Self {
        let data = pixmap.data().iter().flat_map(|p| unpremultiply(*p)).collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

fn device_size(width: u32, height: u32) -> RenderResult<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(RendererError::InvalidSize { width, height }),
    }
}

/// Software renderer drawing into an owned [`Frame`].
pub struct RasterRenderer {
    frame: Frame,
    background: Color,
    pointer: Option<Point>,
}

impl RasterRenderer {
    /// Create a renderer with a `width` x `height` pixel target.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Ok(Self {
            frame: Frame::new(width, height)?,
            background: Color::from_rgba8(250, 250, 250, 255),
            pointer: None,
        })
    }

    /// Set the background used by [`Surface::render`].
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Record the pointer position reported by [`Surface::pointer_position`].
    pub fn set_pointer(&mut self, position: Option<Point>) {
        self.pointer = position;
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    fn rasterize(&self, ctx: &RenderContext, scale: f64) -> RenderResult<Frame> {
        let device = ctx.viewport_size * scale;
        let width = device.width.round().max(0.0) as u32;
        let height = device.height.round().max(0.0) as u32;
        let (w, h) = device_size(width, height)?;

        let mut cpu = CpuContext::new(w, h);
        cpu.set_paint(paint(self.background_color(ctx).into()));
        cpu.fill_rect(&vk::Rect::new(0.0, 0.0, w as f64, h as f64));

        cpu.set_transform(Affine::scale(scale));
        for shape in ctx.scene.shapes() {
            draw_shape(&mut cpu, shape);
        }

        if let Some(selected) = ctx.selected.and_then(|id| ctx.scene.get(id)) {
            let outline = vk_rect(selected.bounds().inflate(4.0, 4.0)).to_path(TOLERANCE);
            cpu.set_stroke(Stroke::new(STROKE_WIDTH));
            cpu.set_paint(paint(ctx.selection_color.into()));
            cpu.stroke_path(&outline);
        }

        cpu.flush();
        let mut pixmap = Pixmap::new(w, h);
        cpu.render_to_pixmap(&mut pixmap);
        Ok(Frame::from_pixmap(&pixmap, width, height))
    }
}

fn draw_shape(cpu: &mut CpuContext, shape: ShapeRef<'_>) {
    match shape {
        ShapeRef::Rectangle(rect) => {
            let path = vk_rect(rect.as_rect()).to_path(TOLERANCE);
            fill_and_outline(cpu, &path, rect.fill);
        }
        ShapeRef::Circle(circle) => {
            let c = circle.as_kurbo();
            let path = vk::Circle::new(vk_point(c.center), c.radius).to_path(TOLERANCE);
            fill_and_outline(cpu, &path, circle.fill);
        }
        ShapeRef::Arrow(arrow) => {
            stroke_polyline(cpu, arrow.points_iter());
            if let Some((from, tip)) = arrow.head_segment() {
                fill_arrow_head(cpu, from, tip, arrow.fill);
            }
        }
        ShapeRef::Scribble(scribble) => stroke_polyline(cpu, scribble.points_iter()),
    }
}

fn fill_and_outline(cpu: &mut CpuContext, path: &BezPath, fill: SerializableColor) {
    cpu.set_paint(paint(fill));
    cpu.fill_path(path);
    cpu.set_stroke(Stroke::new(STROKE_WIDTH));
    cpu.set_paint(paint(STROKE_COLOR));
    cpu.stroke_path(path);
}

fn stroke_polyline(cpu: &mut CpuContext, points: impl Iterator<Item = Point>) {
    let mut path = BezPath::new();
    for (i, p) in points.enumerate() {
        if i == 0 {
            path.move_to(vk_point(p));
        } else {
            path.line_to(vk_point(p));
        }
    }
    if path.elements().len() < 2 {
        return;
    }
    cpu.set_stroke(Stroke::new(STROKE_WIDTH).with_caps(Cap::Round).with_join(Join::Round));
    cpu.set_paint(paint(STROKE_COLOR));
    cpu.stroke_path(&path);
}

fn fill_arrow_head(cpu: &mut CpuContext, from: Point, tip: Point, fill: SerializableColor) {
    let dir = tip - from;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return;
    }
    let unit = dir / len;
    let normal = kurbo::Vec2::new(-unit.y, unit.x);
    let base = tip - unit * ARROW_HEAD_LENGTH;
    let half = normal * (ARROW_HEAD_WIDTH / 2.0);

    let mut head = BezPath::new();
    head.move_to(vk_point(tip));
    head.line_to(vk_point(base + half));
    head.line_to(vk_point(base - half));
    head.close_path();
    cpu.set_paint(paint(fill));
    cpu.fill_path(&head);
}

impl Renderer for RasterRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let scale = if ctx.scale_factor > 0.0 { ctx.scale_factor } else { 1.0 };
        match self.rasterize(ctx, scale) {
            Ok(frame) => self.frame = frame,
            Err(e) => log::error!("Skipping frame: {}", e),
        }
    }
}

impl Surface for RasterRenderer {
    fn render(&mut self, scene: &Scene) {
        let size = Size::new(self.frame.width as f64, self.frame.height as f64);
        let ctx = RenderContext::new(scene, size).with_background(self.background);
        self.build_scene(&ctx);
    }

    fn pointer_position(&self) -> Option<Point> {
        self.pointer
    }
}
