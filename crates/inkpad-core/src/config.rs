//! Session configuration.

use crate::shapes::SerializableColor;
use crate::storage::{HISTORY_INDEX_KEY, HISTORY_KEY};
use serde::{Deserialize, Serialize};

/// Settings for a [`DrawingSession`](crate::session::DrawingSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fill color new shapes start with.
    pub default_fill: SerializableColor,
    /// Maximum number of history entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Storage key for the list of scenes.
    pub history_key: String,
    /// Storage key for the cursor.
    pub history_index_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_fill: SerializableColor::red(),
            history_limit: None,
            history_key: HISTORY_KEY.to_string(),
            history_index_key: HISTORY_INDEX_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r##"{"default_fill": "#00ff00", "history_limit": 20}"##).unwrap();
        assert_eq!(config.default_fill, SerializableColor::rgb(0, 255, 0));
        assert_eq!(config.history_limit, Some(20));
        assert_eq!(config.history_key, "drawingHistory");
        assert_eq!(config.history_index_key, "drawingHistoryIndex");
    }

    #[test]
    fn test_empty_config() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
