//! Inkpad Application
//!
//! Headless application shell: configuration, input-script replay against a
//! drawing session, and PNG export.

mod app;
mod config;
mod error;
mod script;
mod shortcuts;

pub use app::App;
pub use config::AppConfig;
pub use error::AppError;
pub use script::{Script, ScriptStep};
pub use shortcuts::ShortcutRegistry;
