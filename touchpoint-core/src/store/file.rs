//! File-backed record store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use super::RecordStore;
use crate::error::StoreError;
use crate::record::AttributionRecord;

/// Default storage key; the file name derives from it
pub const DEFAULT_STORAGE_KEY: &str = "utm_params";

/// File-backed storage for the attribution record
///
/// One JSON object per store, written under `<dir>/<storage_key>.json`.
/// Writes are read-modify-write within a single call; concurrent writers
/// race with last-writer-wins, which is accepted.
pub struct FileStore {
    file_path: PathBuf,
}

impl FileStore {
    /// Create a store writing `<storage_key>.json` under `dir`
    pub fn new(dir: impl AsRef<Path>, storage_key: &str) -> Self {
        Self {
            file_path: dir.as_ref().join(format!("{storage_key}.json")),
        }
    }

    /// Create a store under the XDG data directory
    pub fn at_default_location(storage_key: &str) -> Self {
        Self::new(touchpoint_paths::data_dir(), storage_key)
    }

    /// Path of the backing file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn persist(&self, record: &AttributionRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.file_path, content).await?;
        Ok(())
    }

    async fn load(&self) -> AttributionRecord {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = ?self.file_path, "No stored record: {}", e);
                return AttributionRecord::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = ?self.file_path, "Discarding malformed record: {}", e);
                AttributionRecord::default()
            }
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
