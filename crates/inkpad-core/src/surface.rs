//! Capabilities the session expects from its host.
//!
//! Rendering, hit-testing and image export live outside the core. A host
//! implements these traits and feeds the results back through
//! [`DrawingSession`](crate::session::DrawingSession).

use crate::scene::Scene;
use kurbo::Point;

/// Something that can draw a scene and report where the pointer is.
pub trait Surface {
    /// Draw `scene`, replacing whatever was drawn before.
    fn render(&mut self, scene: &Scene);

    /// Pointer position in canvas coordinates, if the pointer is over the surface.
    fn pointer_position(&self) -> Option<Point>;
}

/// Turns a scene snapshot into an encoded image.
pub trait SceneExporter {
    type Error: std::error::Error;

    /// Encode `scene` into image bytes.
    fn export(&self, scene: &Scene) -> Result<Vec<u8>, Self::Error>;
}
