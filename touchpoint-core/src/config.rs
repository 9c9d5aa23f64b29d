//! Tracker configuration
//!
//! TOML-loadable, defaulted field by field so an empty document (or a
//! document from an older release) still parses into something usable.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::store::DEFAULT_STORAGE_KEY;

fn default_true() -> bool {
    true
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Analytics delivery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Whether events are delivered at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Endpoint for the HTTP sink; no endpoint means no HTTP delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,
    /// User agent reported in event context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            user_agent: None,
        }
    }
}

/// Top-level tracker configuration
///
/// The analytics table is last so the struct serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Storage key; the persisted file name derives from it
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Apply the form sink during propagation
    #[serde(default = "default_true")]
    pub propagate_forms: bool,
    /// Apply the embed sink during propagation
    #[serde(default = "default_true")]
    pub propagate_embeds: bool,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            propagate_forms: true,
            propagate_embeds: true,
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parse a TOML document; missing fields fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
