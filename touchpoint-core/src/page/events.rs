//! Page mutation events published by the host

use serde::{Deserialize, Serialize};

/// A page mutation the propagation service reacts to
///
/// The host publishes these over a `tokio::sync::broadcast` channel
/// after mutating the shared `PageModel`; the service re-reads the
/// store and re-applies the sinks on each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Initial page render finished
    PageLoaded,
    /// A form appeared on the page
    FormAdded,
    /// An embedded frame appeared on the page
    EmbedAdded,
}
