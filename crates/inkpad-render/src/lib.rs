//! Inkpad Render Library
//!
//! Renderer abstraction plus a `vello_cpu` rasterizer that draws scenes into
//! an RGBA frame and encodes them as PNG.

mod png_export;
mod raster;
mod renderer;

pub use png_export::{PngExporter, PngRenderResult, encode_png};
pub use raster::{Frame, RasterRenderer};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
