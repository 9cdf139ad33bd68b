//! Save/load of the progress record
//!
//! Features:
//! - Versioned JSON blob under a single key
//! - Corruption falls back to the empty record
//! - Pluggable key-value backend (LocalStorage on web, memory elsewhere)
//! - Pretty-printed export

pub mod export;
#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

pub use export::{export_filename, export_json};
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

use crate::consts::SCHEMA_VERSION;
use crate::progress::ProgressRecord;

/// Errors surfaced by storage backends
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("write failed: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Minimal string key-value store, shaped after `window.localStorage`
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Reads and writes the [`ProgressRecord`] blob
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the saved record; any failure yields the default record
    pub fn load(&self) -> ProgressRecord {
        self.try_load().unwrap_or_default()
    }

    /// Load the saved record, `None` when nothing usable is stored
    pub fn try_load(&self) -> Option<ProgressRecord> {
        let json = match self.storage.get_item(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                return None;
            }
            Err(e) => {
                log::warn!("Could not read saved progress: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<ProgressRecord>(&json) {
            Ok(record) => {
                if record.version > SCHEMA_VERSION {
                    log::warn!(
                        "Saved progress has schema version {} (expected {}), reading known fields",
                        record.version,
                        SCHEMA_VERSION
                    );
                }
                log::info!(
                    "Loaded progress ({} items, {} prompts)",
                    record.completed_items.len(),
                    record.custom_prompts.len()
                );
                Some(record)
            }
            Err(e) => {
                log::warn!("Discarding unreadable saved progress: {}", e);
                None
            }
        }
    }

    /// Overwrite the stored blob with `record`
    pub fn persist(&mut self, record: &ProgressRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(record)?;
        self.storage.set_item(&self.key, &json)?;
        log::debug!("Progress saved ({} bytes)", json.len());
        Ok(())
    }

    /// Remove the stored blob
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)?;
        log::info!("Saved progress cleared");
        Ok(())
    }
}
