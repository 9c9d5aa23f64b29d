//! Attribution record and tracked parameter keys

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketing parameters recognized in page URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    /// Traffic source (e.g. google, newsletter)
    UtmSource,
    /// Marketing medium (e.g. cpc, email)
    UtmMedium,
    /// Campaign name
    UtmCampaign,
    /// Paid search term
    UtmTerm,
    /// Content variant within a campaign
    UtmContent,
    /// Campaign ID
    UtmId,
    /// Google Ads click ID
    Gclid,
    /// Facebook click ID
    Fbclid,
    /// Microsoft Ads click ID
    Msclkid,
    /// TikTok click ID
    Ttclid,
}

impl ParamKey {
    /// All tracked keys, in the order they appear in query strings
    pub const ALL: [ParamKey; 10] = [
        ParamKey::UtmSource,
        ParamKey::UtmMedium,
        ParamKey::UtmCampaign,
        ParamKey::UtmTerm,
        ParamKey::UtmContent,
        ParamKey::UtmId,
        ParamKey::Gclid,
        ParamKey::Fbclid,
        ParamKey::Msclkid,
        ParamKey::Ttclid,
    ];

    /// Convert to the query-string/JSON representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UtmSource => "utm_source",
            Self::UtmMedium => "utm_medium",
            Self::UtmCampaign => "utm_campaign",
            Self::UtmTerm => "utm_term",
            Self::UtmContent => "utm_content",
            Self::UtmId => "utm_id",
            Self::Gclid => "gclid",
            Self::Fbclid => "fbclid",
            Self::Msclkid => "msclkid",
            Self::Ttclid => "ttclid",
        }
    }

    /// Parse from the query-string/JSON representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "utm_source" => Some(Self::UtmSource),
            "utm_medium" => Some(Self::UtmMedium),
            "utm_campaign" => Some(Self::UtmCampaign),
            "utm_term" => Some(Self::UtmTerm),
            "utm_content" => Some(Self::UtmContent),
            "utm_id" => Some(Self::UtmId),
            "gclid" => Some(Self::Gclid),
            "fbclid" => Some(Self::Fbclid),
            "msclkid" => Some(Self::Msclkid),
            "ttclid" => Some(Self::Ttclid),
            _ => None,
        }
    }
}

/// The persisted attribution state for a visitor
///
/// All keys are optional; absence means "not observed this visit". The
/// record merges additively: a later capture never clears a key it does
/// not mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gclid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbclid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msclkid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttclid: Option<String>,

    /// Page URL without its query string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<String>,
    /// Upstream referrer, or the sentinel `"direct"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Instant of the most recent capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Epoch milliseconds of the earliest capture for this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_touch: Option<i64>,
}

impl AttributionRecord {
    /// Get a tracked parameter value
    pub fn param(&self, key: ParamKey) -> Option<&str> {
        let value = match key {
            ParamKey::UtmSource => &self.utm_source,
            ParamKey::UtmMedium => &self.utm_medium,
            ParamKey::UtmCampaign => &self.utm_campaign,
            ParamKey::UtmTerm => &self.utm_term,
            ParamKey::UtmContent => &self.utm_content,
            ParamKey::UtmId => &self.utm_id,
            ParamKey::Gclid => &self.gclid,
            ParamKey::Fbclid => &self.fbclid,
            ParamKey::Msclkid => &self.msclkid,
            ParamKey::Ttclid => &self.ttclid,
        };
        value.as_deref()
    }

    /// Set a tracked parameter value
    pub fn set_param(&mut self, key: ParamKey, value: impl Into<String>) {
        let slot = match key {
            ParamKey::UtmSource => &mut self.utm_source,
            ParamKey::UtmMedium => &mut self.utm_medium,
            ParamKey::UtmCampaign => &mut self.utm_campaign,
            ParamKey::UtmTerm => &mut self.utm_term,
            ParamKey::UtmContent => &mut self.utm_content,
            ParamKey::UtmId => &mut self.utm_id,
            ParamKey::Gclid => &mut self.gclid,
            ParamKey::Fbclid => &mut self.fbclid,
            ParamKey::Msclkid => &mut self.msclkid,
            ParamKey::Ttclid => &mut self.ttclid,
        };
        *slot = Some(value.into());
    }

    /// Iterate over the tracked parameters present in this record,
    /// in allowlist order
    pub fn params(&self) -> impl Iterator<Item = (ParamKey, &str)> {
        ParamKey::ALL
            .into_iter()
            .filter_map(|key| self.param(key).map(|value| (key, value)))
    }

    /// True when no key has been observed yet
    pub fn is_empty(&self) -> bool {
        self.params().next().is_none()
            && self.landing_page.is_none()
            && self.referrer.is_none()
            && self.timestamp.is_none()
            && self.first_touch.is_none()
    }

    /// Key-wise union of two records
    ///
    /// Every key present in `incoming` overwrites; keys only in `existing`
    /// are preserved. `first_touch` is the exception: the existing value
    /// wins so the field keeps pointing at the earliest capture.
    pub fn merge(existing: &Self, incoming: &Self) -> Self {
        let mut merged = existing.clone();
        for key in ParamKey::ALL {
            if let Some(value) = incoming.param(key) {
                merged.set_param(key, value);
            }
        }
        if incoming.landing_page.is_some() {
            merged.landing_page = incoming.landing_page.clone();
        }
        if incoming.referrer.is_some() {
            merged.referrer = incoming.referrer.clone();
        }
        if incoming.timestamp.is_some() {
            merged.timestamp = incoming.timestamp;
        }
        if merged.first_touch.is_none() {
            merged.first_touch = incoming.first_touch;
        }
        merged
    }

    /// Re-serialize the UTM/click-id subset as a URL-encoded query string
    ///
    /// Derived fields (landing page, referrer, timestamps) are excluded.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.params() {
            serializer.append_pair(key.as_str(), value);
        }
        serializer.finish()
    }

    /// Flatten into a JSON object map, for analytics payloads
    pub fn as_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}
