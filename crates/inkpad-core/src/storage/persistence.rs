//! Write-through persistence of the undo/redo history.
//!
//! The history is stored under two keys: the JSON array of scenes and the
//! cursor as a decimal string. Both are written on every history change and
//! read once at startup. Anything missing or inconsistent on read means
//! "start fresh", never a failed startup.

use super::{KeyValueStore, StorageError};
use crate::config::SessionConfig;
use crate::history::History;
use crate::scene::Scene;
use thiserror::Error;

/// Key holding the JSON-encoded list of scenes.
pub const HISTORY_KEY: &str = "drawingHistory";

/// Key holding the cursor as a decimal string.
pub const HISTORY_INDEX_KEY: &str = "drawingHistoryIndex";

/// Persistence failures. Never propagated past [`HistoryPersistence::save`]
/// or [`HistoryPersistence::load`].
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read persisted history: {0}")]
    Read(#[source] StorageError),
    #[error("Failed to write persisted history: {0}")]
    Write(#[source] StorageError),
    #[error("Failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Persisted history is corrupt: {0}")]
    Decode(String),
}

/// The two stored values, before they hit the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHistory {
    pub entries: String,
    pub cursor: String,
}

impl EncodedHistory {
    /// Encode a history into its stored form.
    pub fn encode(history: &History) -> Result<Self, PersistenceError> {
        let entries = serde_json::to_string(history.entries()).map_err(PersistenceError::Encode)?;
        Ok(Self {
            entries,
            cursor: history.cursor().to_string(),
        })
    }

    /// Decode and validate a stored history.
    pub fn decode(&self) -> Result<History, PersistenceError> {
        let entries: Vec<Scene> = serde_json::from_str(&self.entries)
            .map_err(|e| PersistenceError::Decode(format!("entries: {}", e)))?;
        for (index, scene) in entries.iter().enumerate() {
            scene
                .validate()
                .map_err(|e| PersistenceError::Decode(format!("entry {}: {}", index, e)))?;
        }
        let cursor: usize = self
            .cursor
            .trim()
            .parse()
            .map_err(|e| PersistenceError::Decode(format!("cursor {:?}: {}", self.cursor, e)))?;
        History::from_parts(entries, cursor).map_err(|e| PersistenceError::Decode(e.to_string()))
    }
}

/// Saves and restores a [`History`] through a key-value store.
pub struct HistoryPersistence<S: KeyValueStore> {
    store: S,
    history_key: String,
    index_key: String,
}

impl<S: KeyValueStore> HistoryPersistence<S> {
    /// Persist under the default keys.
    pub fn new(store: S) -> Self {
        Self {
            store,
            history_key: HISTORY_KEY.to_string(),
            index_key: HISTORY_INDEX_KEY.to_string(),
        }
    }

    /// Persist under the keys named in `config`.
    pub fn with_config(store: S, config: &SessionConfig) -> Self {
        Self {
            store,
            history_key: config.history_key.clone(),
            index_key: config.history_index_key.clone(),
        }
    }

    /// Get a reference to the storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write both keys, reporting failures.
    pub fn try_save(&self, history: &History) -> Result<(), PersistenceError> {
        let encoded = EncodedHistory::encode(history)?;
        self.store
            .set(&self.history_key, &encoded.entries)
            .map_err(PersistenceError::Write)?;
        self.store
            .set(&self.index_key, &encoded.cursor)
            .map_err(PersistenceError::Write)?;
        Ok(())
    }

    /// Write both keys. Failures are logged and reported as `false`.
    pub fn save(&self, history: &History) -> bool {
        match self.try_save(history) {
            Ok(()) => {
                log::trace!(
                    "Saved history ({} entries, cursor {})",
                    history.len(),
                    history.cursor()
                );
                true
            }
            Err(e) => {
                log::warn!("History not persisted, continuing in memory: {}", e);
                false
            }
        }
    }

    /// Read both keys. `Ok(None)` when either key is absent.
    pub fn try_load(&self) -> Result<Option<History>, PersistenceError> {
        let entries = self.store.get(&self.history_key).map_err(PersistenceError::Read)?;
        let cursor = self.store.get(&self.index_key).map_err(PersistenceError::Read)?;
        match (entries, cursor) {
            (Some(entries), Some(cursor)) => EncodedHistory { entries, cursor }.decode().map(Some),
            _ => Ok(None),
        }
    }

    /// Read both keys. Absent, unreadable or corrupt state yields `None`.
    pub fn load(&self) -> Option<History> {
        match self.try_load() {
            Ok(Some(history)) => {
                log::info!(
                    "Restored history ({} entries, cursor {})",
                    history.len(),
                    history.cursor()
                );
                Some(history)
            }
            Ok(None) => {
                log::debug!("No persisted history found");
                None
            }
            Err(e) => {
                log::warn!("Ignoring persisted history: {}", e);
                None
            }
        }
    }

    /// Remove both keys.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(&self.history_key).map_err(PersistenceError::Write)?;
        self.store.remove(&self.index_key).map_err(PersistenceError::Write)?;
        Ok(())
    }
}
