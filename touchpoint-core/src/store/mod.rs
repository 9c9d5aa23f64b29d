//! Record stores: the persistence seam for attribution state
//!
//! `RecordStore` abstracts over the durable key-value storage the host
//! provides. `load()` is defensive by contract: consumers assume it never
//! fails, so implementations degrade to an empty record on any error.

mod file;
mod memory;

use async_trait::async_trait;

pub use file::{DEFAULT_STORAGE_KEY, FileStore};
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::record::AttributionRecord;

/// Durable storage for the attribution record
///
/// Implementations must:
/// - persist the whole record under a single fixed key
/// - return an EMPTY record from `load` when the key is absent, the
///   payload is malformed, or the storage fails (never an error)
/// - make `clear` idempotent
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Serialize the record under the fixed storage key
    async fn persist(&self, record: &AttributionRecord) -> Result<(), StoreError>;

    /// Deserialize the stored record, degrading to empty on any failure
    async fn load(&self) -> AttributionRecord;

    /// Remove the persisted record; a second call is a no-op
    async fn clear(&self) -> Result<(), StoreError>;
}
