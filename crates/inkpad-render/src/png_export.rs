//! PNG export of scene snapshots.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use inkpad_core::scene::Scene;
use inkpad_core::surface::SceneExporter;
use kurbo::Size;
use peniko::Color;

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// Encode the pixels as PNG bytes.
    pub fn encode(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.rgba_data, self.width, self.height)
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if rgba_data.len() != expected {
        return Err(RendererError::RenderFailed(format!(
            "expected {} bytes of RGBA data for {}x{}, got {}",
            expected,
            width,
            height,
            rgba_data.len()
        )));
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }

    Ok(png_data)
}

/// Renders a scene with [`RasterRenderer`] and encodes the frame as PNG.
#[derive(Debug, Clone)]
pub struct PngExporter {
    /// Canvas size in canvas units.
    pub size: Size,
    /// Device pixels per canvas unit.
    pub scale_factor: f64,
    pub background: Color,
}

impl PngExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width as f64, height as f64),
            scale_factor: 1.0,
            background: Color::from_rgba8(250, 250, 250, 255),
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Rasterize `scene` without encoding.
    pub fn render(&self, scene: &Scene) -> RenderResult<PngRenderResult> {
        let device = self.size * self.scale_factor;
        let width = device.width.round().max(0.0) as u32;
        let height = device.height.round().max(0.0) as u32;

        let mut renderer = RasterRenderer::new(width, height)?;
        let ctx = RenderContext::new(scene, self.size)
            .with_scale_factor(self.scale_factor)
            .with_background(self.background);
        renderer.build_scene(&ctx);

        let frame = renderer.into_frame();
        log::debug!(
            "Rendered {} shapes into {}x{} pixels",
            scene.len(),
            frame.width(),
            frame.height()
        );
        Ok(PngRenderResult {
            width: frame.width(),
            height: frame.height(),
            rgba_data: frame.into_data(),
        })
    }
}

impl SceneExporter for PngExporter {
    type Error = RendererError;

    fn export(&self, scene: &Scene) -> Result<Vec<u8>, Self::Error> {
        self.render(scene)?.encode()
    }
}
