//! Error types for touchpoint-core

use thiserror::Error;

/// Top-level error type for touchpoint-core
#[derive(Error, Debug)]
pub enum TouchpointError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the record stores
///
/// These never reach host-facing read paths: `RecordStore::load` degrades
/// to an empty record instead of returning them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from the propagation and analytics sinks
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("invalid embed URL {src:?}: {reason}")]
    InvalidEmbedUrl { src: String, reason: String },

    #[error("failed to deliver analytics event: {0}")]
    Delivery(String),
}

/// Errors from configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
