//! Analytics sink: attribution-enriched event delivery
//!
//! Events carry the full attribution record merged with caller-supplied
//! properties. Delivery targets are behind `AnalyticsSink` so hosts can
//! plug in their own transport; `HttpSink` covers the common JSON POST.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::SinkError;
use crate::record::AttributionRecord;

/// Page-level context attached to every event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// A single analytics event, ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub context: EventContext,
}

impl AnalyticsEvent {
    /// Build an event from the record plus caller-supplied properties
    ///
    /// Record fields seed the data map; `extra` overrides them key by
    /// key. The event name and timestamp are mirrored into the data map
    /// so downstream consumers see them without unwrapping the envelope.
    pub fn from_record(
        event_name: &str,
        record: &AttributionRecord,
        extra: Map<String, Value>,
        now: DateTime<Utc>,
        context: EventContext,
    ) -> Self {
        let mut data = record.as_json_map();
        for (key, value) in extra {
            data.insert(key, value);
        }
        data.insert(
            "event_name".to_string(),
            Value::String(event_name.to_string()),
        );
        data.insert("timestamp".to_string(), Value::String(now.to_rfc3339()));

        Self {
            event: event_name.to_string(),
            data,
            timestamp: now,
            context,
        }
    }
}

/// Transport seam for analytics delivery
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Deliver one event
    async fn deliver(&self, event: &AnalyticsEvent) -> Result<(), SinkError>;
}

/// JSON POST delivery to a fixed endpoint
pub struct HttpSink {
    endpoint: Url,
    client: Client,
}

impl HttpSink {
    /// Create a sink posting to `endpoint`
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl AnalyticsSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(|e| SinkError::Delivery(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| SinkError::Delivery(e.to_string()))?;
        Ok(())
    }
}

/// Recording sink for tests and dry runs
#[derive(Default)]
pub struct MockSink {
    events: std::sync::Mutex<Vec<AnalyticsEvent>>,
    fail: bool,
}

impl MockSink {
    /// Create a sink that accepts every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every event
    pub fn failing() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Events delivered so far
    pub fn delivered(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalyticsSink for MockSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn deliver(&self, event: &AnalyticsEvent) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Delivery("mock sink set to fail".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
