//! Pure capture of attribution parameters from a page URL

use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

use crate::record::{AttributionRecord, ParamKey};

/// Referrer sentinel used when no upstream referrer is present
pub const DIRECT_REFERRER: &str = "direct";

/// A single page load as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVisit {
    /// Full page URL, including the query string
    pub url: String,
    /// Opaque upstream referrer, if any
    pub referrer: Option<String>,
}

impl PageVisit {
    /// Create a visit with no referrer
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referrer: None,
        }
    }

    /// Attach the upstream referrer
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}

/// Capture allowlisted parameters from a page visit
///
/// Returns `None` when the URL carries no allowlisted key (or cannot be
/// parsed at all); in that case nothing should be written. When at least
/// one key is present the result also carries the landing page (URL
/// stripped of query and fragment), the referrer (or `"direct"`), the
/// capture instant, and a first-touch stamp.
///
/// Pure function of its input plus the supplied clock; never writes.
pub fn capture(visit: &PageVisit, now: DateTime<Utc>) -> Option<AttributionRecord> {
    let url = match Url::parse(&visit.url) {
        Ok(url) => url,
        Err(e) => {
            debug!(url = %visit.url, "Skipping capture, unparseable page URL: {}", e);
            return None;
        }
    };

    let mut record = AttributionRecord::default();
    let mut found = false;
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        if let Some(param) = ParamKey::parse(&key) {
            record.set_param(param, value.into_owned());
            found = true;
        }
    }

    if !found {
        return None;
    }

    record.landing_page = Some(landing_page(&url));
    record.referrer = Some(
        visit
            .referrer
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_REFERRER)
            .to_string(),
    );
    record.timestamp = Some(now);
    record.first_touch = Some(now.timestamp_millis());

    Some(record)
}

/// Page URL with query string and fragment stripped
fn landing_page(url: &Url) -> String {
    let mut landing = url.clone();
    landing.set_query(None);
    landing.set_fragment(None);
    landing.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn capture_without_allowlisted_keys_returns_none() {
        let visit = PageVisit::new("https://site.com/?page=2&sort=asc");
        assert!(capture(&visit, now()).is_none());
    }

    #[test]
    fn capture_without_any_query_returns_none() {
        let visit = PageVisit::new("https://site.com/pricing");
        assert!(capture(&visit, now()).is_none());
    }

    #[test]
    fn capture_unparseable_url_returns_none() {
        let visit = PageVisit::new("not a url at all");
        assert!(capture(&visit, now()).is_none());
    }

    #[test]
    fn capture_picks_up_utm_and_click_ids() {
        let visit =
            PageVisit::new("https://site.com/?utm_source=google&utm_medium=cpc&gclid=g-123");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.param(ParamKey::UtmSource), Some("google"));
        assert_eq!(record.param(ParamKey::UtmMedium), Some("cpc"));
        assert_eq!(record.param(ParamKey::Gclid), Some("g-123"));
        assert_eq!(record.param(ParamKey::Fbclid), None);
    }

    #[test]
    fn capture_ignores_unrelated_query_params() {
        let visit = PageVisit::new("https://site.com/?utm_source=google&page=2");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.param(ParamKey::UtmSource), Some("google"));
        assert_eq!(record.query_string(), "utm_source=google");
    }

    #[test]
    fn capture_skips_empty_values() {
        let visit = PageVisit::new("https://site.com/?utm_source=&utm_medium=cpc");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.param(ParamKey::UtmSource), None);
        assert_eq!(record.param(ParamKey::UtmMedium), Some("cpc"));
    }

    #[test]
    fn capture_computes_landing_page_without_query() {
        let visit = PageVisit::new("https://site.com/?utm_source=google&utm_medium=cpc");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.landing_page.as_deref(), Some("https://site.com/"));
    }

    #[test]
    fn capture_strips_fragment_from_landing_page() {
        let visit = PageVisit::new("https://site.com/pricing?utm_source=google#plans");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(
            record.landing_page.as_deref(),
            Some("https://site.com/pricing")
        );
    }

    #[test]
    fn capture_defaults_referrer_to_direct() {
        let visit = PageVisit::new("https://site.com/?utm_source=google");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.referrer.as_deref(), Some(DIRECT_REFERRER));
    }

    #[test]
    fn capture_treats_empty_referrer_as_direct() {
        let visit = PageVisit::new("https://site.com/?utm_source=google").with_referrer("");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.referrer.as_deref(), Some(DIRECT_REFERRER));
    }

    #[test]
    fn capture_keeps_real_referrer() {
        let visit = PageVisit::new("https://site.com/?utm_source=google")
            .with_referrer("https://news.ycombinator.com/");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(
            record.referrer.as_deref(),
            Some("https://news.ycombinator.com/")
        );
    }

    #[test]
    fn capture_stamps_timestamp_and_first_touch() {
        let instant = now();
        let visit = PageVisit::new("https://site.com/?utm_source=google");
        let record = capture(&visit, instant).unwrap();

        assert_eq!(record.timestamp, Some(instant));
        assert_eq!(record.first_touch, Some(instant.timestamp_millis()));
    }

    #[test]
    fn capture_decodes_percent_encoded_values() {
        let visit = PageVisit::new("https://site.com/?utm_campaign=spring%20sale");
        let record = capture(&visit, now()).unwrap();

        assert_eq!(record.param(ParamKey::UtmCampaign), Some("spring sale"));
    }
}
