//! CLI command implementations

pub mod capture;
pub mod clear;
pub mod decorate;
pub mod query_string;
pub mod show;
pub mod track;

use std::sync::Arc;

use touchpoint_core::{AttributionTracker, FileStore, TrackerConfig};

/// Build a tracker over the file store in the XDG data directory
pub(crate) fn build_tracker(config: TrackerConfig) -> AttributionTracker {
    let store = Arc::new(FileStore::at_default_location(&config.storage_key));
    AttributionTracker::new(config, store)
}
