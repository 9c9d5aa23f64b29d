//! touchpoint-core: Core library for marketing attribution capture
//!
//! This crate provides the foundational components for touchpoint:
//!
//! - **Attribution record** - [`AttributionRecord`] and [`ParamKey`] for the tracked key set
//! - **Capture** - [`capture::capture`] for pure extraction from page URLs
//! - **Stores** - [`RecordStore`] trait with [`FileStore`] and [`MemoryStore`]
//! - **Tracker** - [`AttributionTracker`] owning capture, merge, and propagation
//! - **Sinks** - form fields, embed URLs, and [`AnalyticsSink`] delivery
//! - **Propagation service** - [`PropagationService`] reacting to [`PageEvent`]s
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use touchpoint_core::{AttributionTracker, MemoryStore, PageVisit, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tracker = AttributionTracker::new(
//!         TrackerConfig::default(),
//!         Arc::new(MemoryStore::new()),
//!     );
//!
//!     let visit = PageVisit::new("https://site.com/?utm_source=google&utm_medium=cpc");
//!     if let Some(record) = tracker.record_visit(&visit).await {
//!         println!("captured: {}", record.query_string());
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! page URL ──> capture ──> merge ──> RecordStore (file / memory)
//!                                        │
//!                   ┌────────────────────┼────────────────────┐
//!                   ▼                    ▼                    ▼
//!             form fields          embed URLs          analytics sinks
//!            (hidden inputs)    (decorated query)      (HTTP / custom)
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod page;
pub mod record;
pub mod sinks;
pub mod store;
pub mod tracker;

// Re-export key types for convenience
pub use capture::{DIRECT_REFERRER, PageVisit};
pub use config::{AnalyticsConfig, TrackerConfig};
pub use error::{ConfigError, SinkError, StoreError, TouchpointError};
pub use page::{
    EmbedFrame, FormField, FormModel, PageEvent, PageModel, PropagationHandle, PropagationService,
};
pub use record::{AttributionRecord, ParamKey};
pub use sinks::{AnalyticsEvent, AnalyticsSink, EventContext, HttpSink, MockSink};
pub use store::{DEFAULT_STORAGE_KEY, FileStore, MemoryStore, RecordStore};
pub use tracker::AttributionTracker;
