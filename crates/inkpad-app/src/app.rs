//! Main application: a drawing session bound to a raster surface.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::script::{Script, ScriptStep};
use inkpad_core::shapes::{ArrowPatch, CirclePatch, RectanglePatch, ScribblePatch};
use inkpad_core::{
    DrawingSession, KeyEvent, KeyValueStore, PointerEvent, SceneExporter, ShapeId, ShapeKind,
    ShapePatch, Surface,
};
use inkpad_render::{PngExporter, RasterRenderer};
use kurbo::Point;
use std::fs;
use std::path::Path;

/// Application state: session, surface and the settings they were built from.
pub struct App<S: KeyValueStore> {
    config: AppConfig,
    session: DrawingSession<S>,
    surface: RasterRenderer,
}

impl<S: KeyValueStore> App<S> {
    /// Open a session over `store` and draw its restored scene.
    pub fn new(config: AppConfig, store: S) -> Result<Self, AppError> {
        let session = DrawingSession::with_config(store, config.session.clone());
        let mut surface = RasterRenderer::new(config.width, config.height)?
            .with_background(config.background_color.into());
        surface.render(session.visible_scene());
        log::info!(
            "{} ready: {}x{} canvas, {} history entries",
            config.title,
            config.width,
            config.height,
            session.history().len()
        );
        Ok(Self {
            config,
            session,
            surface,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &DrawingSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DrawingSession<S> {
        &mut self.session
    }

    pub fn surface(&self) -> &RasterRenderer {
        &self.surface
    }

    /// Replay every step of `script`, stopping at the first failure.
    pub fn run_script(&mut self, script: &Script) -> Result<(), AppError> {
        log::info!("Replaying {} script steps", script.len());
        for (index, step) in script.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", index, step);
            self.apply(step)?;
        }
        Ok(())
    }

    /// Apply one step and redraw if the visible scene may have changed.
    pub fn apply(&mut self, step: &ScriptStep) -> Result<(), AppError> {
        let changed = match step {
            ScriptStep::Tool { tool } => {
                let drafting = self.session.is_drafting();
                self.session.set_tool(*tool);
                drafting
            }
            ScriptStep::Fill { color } => {
                self.session.set_fill(*color);
                false
            }
            ScriptStep::Down { x, y } => self.pointer(Point::new(*x, *y), |position| {
                PointerEvent::Down { position }
            })?,
            ScriptStep::Move { x, y } => self.pointer(Point::new(*x, *y), |position| {
                PointerEvent::Move { position }
            })?,
            ScriptStep::Up { x, y } => {
                self.pointer(Point::new(*x, *y), |position| PointerEvent::Up { position })?
            }
            ScriptStep::Key { key, modifiers } => {
                let outcome = self.session.handle_key(&KeyEvent::new(key.clone(), *modifiers));
                if !outcome.is_claimed() {
                    log::debug!("Key {:?} not handled", key);
                }
                outcome.is_claimed()
            }
            ScriptStep::Undo => self.session.undo(),
            ScriptStep::Redo => self.session.redo(),
            ScriptStep::Select { id } => {
                if !self.session.select(*id) {
                    log::warn!("Cannot select {}: not in the current scene", id);
                }
                false
            }
            ScriptStep::MoveShape { id, x, y } => {
                let patch = self.move_patch(*id, *x, *y)?;
                self.session.commit_edit(*id, &patch)?;
                true
            }
        };

        if changed {
            self.surface.render(self.session.visible_scene());
        }
        Ok(())
    }

    /// Route a pointer step through the surface, the way a host reads the
    /// pointer position off its canvas.
    fn pointer(
        &mut self,
        at: Point,
        event: impl FnOnce(Point) -> PointerEvent,
    ) -> Result<bool, AppError> {
        self.surface.set_pointer(Some(at));
        let Some(position) = self.surface.pointer_position() else {
            return Ok(false);
        };
        Ok(self.session.handle_pointer(event(position))?)
    }

    fn move_patch(&self, id: ShapeId, x: f64, y: f64) -> Result<ShapePatch, AppError> {
        let kind = self
            .session
            .visible_scene()
            .get(id)
            .map(|shape| shape.kind())
            .ok_or(AppError::UnknownShape(id))?;
        let (x, y) = (Some(x), Some(y));
        Ok(match kind {
            ShapeKind::Rectangle => ShapePatch::Rectangle(RectanglePatch {
                x,
                y,
                ..RectanglePatch::default()
            }),
            ShapeKind::Circle => ShapePatch::Circle(CirclePatch {
                x,
                y,
                ..CirclePatch::default()
            }),
            ShapeKind::Arrow => ShapePatch::Arrow(ArrowPatch {
                x,
                y,
                ..ArrowPatch::default()
            }),
            ShapeKind::Scribble => ShapePatch::Scribble(ScribblePatch {
                x,
                y,
                ..ScribblePatch::default()
            }),
        })
    }

    /// Encode the visible scene as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, AppError> {
        let exporter = PngExporter::new(self.config.width, self.config.height)
            .with_scale_factor(self.config.scale_factor)
            .with_background(self.config.background_color.into());
        Ok(exporter.export(self.session.visible_scene())?)
    }

    /// Export the visible scene to a PNG file.
    pub fn export_png_to(&self, path: &Path) -> Result<(), AppError> {
        let bytes = self.export_png()?;
        fs::write(path, &bytes).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Exported {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
