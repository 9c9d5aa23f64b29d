//! Embed sink: attribution params appended to embedded frame URLs
//!
//! Unlike forms, embeds are first-write-wins: a param already present in
//! the frame URL is left alone, so a frame that was decorated once (or
//! arrives pre-decorated from the host) keeps its original values.

use tracing::warn;
use url::Url;

use crate::error::SinkError;
use crate::page::EmbedFrame;
use crate::record::AttributionRecord;

/// Append tracked params from the record to a single embed URL
///
/// Params already present in the URL keep their existing values. When
/// the record adds nothing, the input string is returned unchanged.
pub fn decorate_url(src: &str, record: &AttributionRecord) -> Result<String, SinkError> {
    let mut url = Url::parse(src).map_err(|e| SinkError::InvalidEmbedUrl {
        src: src.to_string(),
        reason: e.to_string(),
    })?;

    let existing: Vec<String> = url
        .query_pairs()
        .map(|(name, _)| name.into_owned())
        .collect();

    let missing: Vec<(&'static str, &str)> = record
        .params()
        .filter(|(key, _)| !existing.iter().any(|name| name == key.as_str()))
        .map(|(key, value)| (key.as_str(), value))
        .collect();

    if missing.is_empty() {
        return Ok(src.to_string());
    }

    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in missing {
            pairs.append_pair(name, value);
        }
    }

    Ok(url.into())
}

/// Decorate every frame in place, skipping frames whose URL will not parse
///
/// Returns the number of frames whose URL changed.
pub fn apply_record(embeds: &mut [EmbedFrame], record: &AttributionRecord) -> usize {
    let mut changed = 0;

    for embed in embeds {
        match decorate_url(&embed.src, record) {
            Ok(decorated) => {
                if decorated != embed.src {
                    embed.src = decorated;
                    changed += 1;
                }
            }
            Err(e) => {
                warn!("Skipping embed: {}", e);
            }
        }
    }

    changed
}
