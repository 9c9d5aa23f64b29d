//! The attribution tracker
//!
//! One explicit instance owns the whole pipeline: capture from page
//! visits, merge into the persistent store, mirror into the session
//! store, and propagation into forms, embeds, and analytics sinks.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::capture::{self, PageVisit};
use crate::config::TrackerConfig;
use crate::error::{SinkError, StoreError};
use crate::page::{FormModel, PageModel};
use crate::record::AttributionRecord;
use crate::sinks::{AnalyticsEvent, AnalyticsSink, EventContext, embeds, forms};
use crate::store::{MemoryStore, RecordStore};

/// Central attribution component
///
/// Storage failures on the write path are logged and swallowed; the
/// read path cannot fail by the `RecordStore` contract. Analytics
/// delivery is spawned and never awaited by the caller.
pub struct AttributionTracker {
    config: TrackerConfig,
    store: Arc<dyn RecordStore>,
    session: MemoryStore,
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl AttributionTracker {
    /// Create a tracker over the given store, with no analytics sinks
    pub fn new(config: TrackerConfig, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            store,
            session: MemoryStore::new(),
            sinks: Vec::new(),
        }
    }

    /// Register an analytics sink; each sink is tried independently
    pub fn add_sink(&mut self, sink: Arc<dyn AnalyticsSink>) {
        self.sinks.push(sink);
    }

    /// The active configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Capture a page visit and merge it into the stored record
    ///
    /// Returns the merged record, or `None` when the visit carried no
    /// allowlisted parameter (the stores stay untouched in that case).
    pub async fn record_visit(&self, visit: &PageVisit) -> Option<AttributionRecord> {
        let captured = capture::capture(visit, Utc::now())?;

        let existing = self.store.load().await;
        let merged = AttributionRecord::merge(&existing, &captured);

        if let Err(e) = self.store.persist(&merged).await {
            warn!("Failed to persist attribution record: {}", e);
        }
        if let Err(e) = self.session.persist(&merged).await {
            warn!("Failed to mirror record into session store: {}", e);
        }

        debug!(
            params = merged.params().count(),
            "Recorded visit into attribution record"
        );
        Some(merged)
    }

    /// The persisted record; empty when nothing was ever captured
    pub async fn load(&self) -> AttributionRecord {
        self.store.load().await
    }

    /// The record captured during this tracker's lifetime
    pub async fn session_record(&self) -> AttributionRecord {
        self.session.load().await
    }

    /// URL-encoded `&`-joined UTM/click-id subset of the stored record
    pub async fn query_string(&self) -> String {
        self.store.load().await.query_string()
    }

    /// Remove the record from both stores
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.session.clear().await?;
        Ok(())
    }

    /// Emit an analytics event enriched with the stored record
    ///
    /// Delivery to each sink is spawned fire-and-forget; per-sink
    /// failures are logged and skipped. Returns the dispatched event,
    /// or `None` when analytics is disabled.
    pub async fn track_event(
        &self,
        name: &str,
        extra: Map<String, Value>,
    ) -> Option<AnalyticsEvent> {
        let context = EventContext {
            page_url: None,
            user_agent: self.config.analytics.user_agent.clone(),
        };
        self.dispatch(name, extra, context).await
    }

    /// Emit a `page_view` event carrying the page URL in its context
    pub async fn track_page_view(&self, page_url: &str) -> Option<AnalyticsEvent> {
        let mut extra = Map::new();
        extra.insert(
            "page_url".to_string(),
            Value::String(page_url.to_string()),
        );
        let context = EventContext {
            page_url: Some(page_url.to_string()),
            user_agent: self.config.analytics.user_agent.clone(),
        };
        self.dispatch("page_view", extra, context).await
    }

    async fn dispatch(
        &self,
        name: &str,
        extra: Map<String, Value>,
        context: EventContext,
    ) -> Option<AnalyticsEvent> {
        if !self.config.analytics.enabled {
            debug!(event = name, "Analytics disabled, dropping event");
            return None;
        }

        let record = self.store.load().await;
        let event = AnalyticsEvent::from_record(name, &record, extra, Utc::now(), context);

        for sink in &self.sinks {
            let sink = Arc::clone(sink);
            let event = event.clone();
            tokio::spawn(async move {
                if let Err(e) = sink.deliver(&event).await {
                    debug!(sink = sink.name(), "Analytics delivery failed: {}", e);
                }
            });
        }

        Some(event)
    }

    /// Apply the form sink to a single form
    pub async fn apply_to_form(&self, form: &mut FormModel) -> usize {
        if !self.config.propagate_forms {
            return 0;
        }
        let record = self.store.load().await;
        forms::apply_record(form, &record)
    }

    /// Decorate a single embed URL with the stored params
    pub async fn decorate_embed_url(&self, src: &str) -> Result<String, SinkError> {
        let record = self.store.load().await;
        embeds::decorate_url(src, &record)
    }

    /// Apply the form and embed sinks across the whole page
    pub async fn propagate(&self, page: &mut PageModel) {
        let record = self.store.load().await;
        if record.is_empty() {
            return;
        }

        let mut fields = 0;
        if self.config.propagate_forms {
            for form in &mut page.forms {
                fields += forms::apply_record(form, &record);
            }
        }

        let mut frames = 0;
        if self.config.propagate_embeds {
            frames = embeds::apply_record(&mut page.embeds, &record);
        }

        debug!(fields, frames, "Propagated attribution record across page");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{EmbedFrame, FormField};
    use crate::record::ParamKey;
    use crate::sinks::MockSink;
    use std::time::Duration;

    fn tracker() -> AttributionTracker {
        AttributionTracker::new(TrackerConfig::default(), Arc::new(MemoryStore::new()))
    }

    async fn wait_for_delivery(sink: &MockSink) -> Vec<AnalyticsEvent> {
        for _ in 0..50 {
            let delivered = sink.delivered();
            if !delivered.is_empty() {
                return delivered;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no event delivered in time");
    }

    // ==================== Visit Recording Tests ====================

    #[tokio::test]
    async fn record_visit_persists_the_captured_record() {
        let tracker = tracker();
        let visit = PageVisit::new("https://site.com/?utm_source=google&utm_medium=cpc");

        let merged = tracker.record_visit(&visit).await.unwrap();
        assert_eq!(merged.param(ParamKey::UtmSource), Some("google"));

        let stored = tracker.load().await;
        assert_eq!(stored, merged);
        assert_eq!(stored.landing_page.as_deref(), Some("https://site.com/"));
        assert_eq!(stored.referrer.as_deref(), Some("direct"));
    }

    #[tokio::test]
    async fn record_visit_without_params_leaves_store_unchanged() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let before = tracker.load().await;
        let result = tracker
            .record_visit(&PageVisit::new("https://site.com/pricing"))
            .await;

        assert!(result.is_none());
        assert_eq!(tracker.load().await, before);
    }

    #[tokio::test]
    async fn record_visit_merges_with_incoming_winning() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new(
                "https://site.com/?utm_source=google&utm_medium=cpc",
            ))
            .await
            .unwrap();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=newsletter"))
            .await
            .unwrap();

        let stored = tracker.load().await;
        assert_eq!(stored.param(ParamKey::UtmSource), Some("newsletter"));
        assert_eq!(stored.param(ParamKey::UtmMedium), Some("cpc"));
    }

    #[tokio::test]
    async fn record_visit_preserves_first_touch() {
        let tracker = tracker();
        let first = tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();
        let second = tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=bing"))
            .await
            .unwrap();

        assert_eq!(second.first_touch, first.first_touch);
    }

    #[tokio::test]
    async fn session_record_mirrors_the_last_merge() {
        let tracker = tracker();
        assert!(tracker.session_record().await.is_empty());

        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        assert_eq!(tracker.session_record().await, tracker.load().await);
    }

    #[tokio::test]
    async fn clear_empties_both_stores() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        tracker.clear().await.unwrap();

        assert!(tracker.load().await.is_empty());
        assert!(tracker.session_record().await.is_empty());
    }

    #[tokio::test]
    async fn query_string_reflects_stored_params() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new(
                "https://site.com/?utm_source=google&gclid=g-123",
            ))
            .await
            .unwrap();

        assert_eq!(tracker.query_string().await, "utm_source=google&gclid=g-123");
    }

    // ==================== Analytics Tests ====================

    #[tokio::test]
    async fn track_event_builds_payload_from_stored_record() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut extra = Map::new();
        extra.insert("plan".to_string(), Value::String("pro".into()));
        let event = tracker.track_event("signup", extra).await.unwrap();

        assert_eq!(event.event, "signup");
        assert_eq!(event.data["utm_source"], "google");
        assert_eq!(event.data["plan"], "pro");
        assert_eq!(event.data["event_name"], "signup");
    }

    #[tokio::test]
    async fn track_event_when_disabled_returns_none() {
        let mut config = TrackerConfig::default();
        config.analytics.enabled = false;
        let tracker = AttributionTracker::new(config, Arc::new(MemoryStore::new()));

        assert!(tracker.track_event("signup", Map::new()).await.is_none());
    }

    #[tokio::test]
    async fn track_event_reaches_registered_sinks() {
        let mut tracker = tracker();
        let sink = Arc::new(MockSink::new());
        tracker.add_sink(sink.clone());

        tracker.track_event("signup", Map::new()).await.unwrap();

        let delivered = wait_for_delivery(&sink).await;
        assert_eq!(delivered[0].event, "signup");
    }

    #[tokio::test]
    async fn failing_sink_does_not_affect_others() {
        let mut tracker = tracker();
        let good = Arc::new(MockSink::new());
        tracker.add_sink(Arc::new(MockSink::failing()));
        tracker.add_sink(good.clone());

        tracker.track_event("signup", Map::new()).await.unwrap();

        let delivered = wait_for_delivery(&good).await;
        assert_eq!(delivered.len(), 1);
    }

    #[tokio::test]
    async fn track_page_view_carries_page_context() {
        let tracker = tracker();
        let event = tracker
            .track_page_view("https://site.com/pricing")
            .await
            .unwrap();

        assert_eq!(event.event, "page_view");
        assert_eq!(
            event.context.page_url.as_deref(),
            Some("https://site.com/pricing")
        );
        assert_eq!(event.data["page_url"], "https://site.com/pricing");
    }

    // ==================== Propagation Tests ====================

    #[tokio::test]
    async fn apply_to_form_writes_hidden_fields() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut form = FormModel::default();
        let written = tracker.apply_to_form(&mut form).await;

        assert!(written > 0);
        assert_eq!(form.field("utm_source").unwrap().value, "google");
    }

    #[tokio::test]
    async fn apply_to_form_respects_config_flag() {
        let mut config = TrackerConfig::default();
        config.propagate_forms = false;
        let tracker = AttributionTracker::new(config, Arc::new(MemoryStore::new()));
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut form = FormModel::default();
        assert_eq!(tracker.apply_to_form(&mut form).await, 0);
        assert!(form.fields.is_empty());
    }

    #[tokio::test]
    async fn decorate_embed_url_appends_stored_params() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let decorated = tracker
            .decorate_embed_url("https://embed.example.com/f/1")
            .await
            .unwrap();
        assert!(decorated.contains("utm_source=google"));
    }

    #[tokio::test]
    async fn propagate_covers_forms_and_embeds() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut page = PageModel::default();
        page.forms.push(FormModel::default());
        page.embeds.push(EmbedFrame::new("https://embed.example.com/f/1"));

        tracker.propagate(&mut page).await;

        assert_eq!(page.forms[0].field("utm_source").unwrap().value, "google");
        assert!(page.embeds[0].src.contains("utm_source=google"));
    }

    #[tokio::test]
    async fn propagate_with_empty_record_is_a_no_op() {
        let tracker = tracker();
        let mut page = PageModel::default();
        page.forms.push(FormModel::default());
        page.embeds.push(EmbedFrame::new("https://embed.example.com/f/1"));

        tracker.propagate(&mut page).await;

        assert!(page.forms[0].fields.is_empty());
        assert_eq!(page.embeds[0].src, "https://embed.example.com/f/1");
    }

    #[tokio::test]
    async fn propagate_respects_embed_flag() {
        let mut config = TrackerConfig::default();
        config.propagate_embeds = false;
        let tracker = AttributionTracker::new(config, Arc::new(MemoryStore::new()));
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut page = PageModel::default();
        page.embeds.push(EmbedFrame::new("https://embed.example.com/f/1"));

        tracker.propagate(&mut page).await;
        assert_eq!(page.embeds[0].src, "https://embed.example.com/f/1");
    }

    #[tokio::test]
    async fn propagate_keeps_existing_embed_params() {
        let tracker = tracker();
        tracker
            .record_visit(&PageVisit::new("https://site.com/?utm_source=google"))
            .await
            .unwrap();

        let mut page = PageModel::default();
        page.embeds.push(EmbedFrame::new(
            "https://embed.example.com/f/1?utm_source=existing",
        ));

        tracker.propagate(&mut page).await;
        assert!(page.embeds[0].src.contains("utm_source=existing"));
        assert!(!page.embeds[0].src.contains("utm_source=google"));
    }
}
