//! Application configuration.

use crate::error::AppError;
use inkpad_core::{SerializableColor, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Canvas width in canvas units.
    pub width: u32,
    /// Canvas height in canvas units.
    pub height: u32,
    /// Device pixels per canvas unit for exports.
    pub scale_factor: f64,
    pub background_color: SerializableColor,
    /// Directory for persisted history. Defaults to the platform data dir.
    pub storage_dir: Option<PathBuf>,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Inkpad".to_string(),
            width: 1280,
            height: 800,
            scale_factor: 1.0,
            background_color: SerializableColor::rgb(250, 250, 250),
            storage_dir: None,
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
