//! In-memory record store
//!
//! Backs the session-scoped mirror of the attribution record and serves
//! as the store implementation for tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::StoreError;
use crate::record::AttributionRecord;

/// In-memory implementation of RecordStore
///
/// State lives for the lifetime of the instance; dropping it evicts
/// the record.
#[derive(Default)]
pub struct MemoryStore {
    record: RwLock<Option<AttributionRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn persist(&self, record: &AttributionRecord) -> Result<(), StoreError> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }

    async fn load(&self) -> AttributionRecord {
        self.record.read().await.clone().unwrap_or_default()
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.record.write().await = None;
        Ok(())
    }
}
