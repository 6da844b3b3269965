//! Payload codec for the upstream explore API
//!
//! This module handles the upstream's bespoke wire format:
//! - Requests carry a percent-encoded JSON object in the `req` query
//!   parameter, with colons (and for widget requests, commas) left literal
//! - Responses are JSON prefixed with a fixed anti-scraping header that
//!   must be stripped before parsing
//!
//! Encoding and decoding are pure and deterministic.

use serde::Serialize;
use thiserror::Error;

/// Fixed non-JSON prefix the upstream prepends to every response body
pub const ENVELOPE_PREFIX: &str = ")]}'";

/// Errors produced while decoding a response envelope
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// One comparison item of an explore request
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonItem {
    pub keyword: String,
    pub geo: String,
    pub time: String,
}

/// Request object for the explore endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ExploreRequest {
    #[serde(rename = "comparisonItem")]
    pub comparison_item: Vec<ComparisonItem>,
    pub category: u32,
    pub property: String,
}

impl ExploreRequest {
    /// Builds the standard single-keyword request with a one-day window
    pub fn for_keyword(keyword: &str, geography: &str) -> Self {
        Self {
            comparison_item: vec![ComparisonItem {
                keyword: keyword.to_string(),
                geo: geography.to_string(),
                time: "now 1-d".to_string(),
            }],
            category: 0,
            property: String::new(),
        }
    }
}

/// Percent-encodes a serializable payload for the `req` query parameter
///
/// The upstream rejects requests whose JSON colons are escaped, so the
/// literal sequence `%3A` is un-escaped back to `:` after encoding.
pub fn encode_request<T: Serialize>(payload: &T) -> CodecResult<String> {
    let raw = serde_json::to_string(payload)
        .map_err(|e| CodecError::MalformedEnvelope(format!("unencodable payload: {}", e)))?;
    Ok(urlencoding::encode(&raw).replace("%3A", ":"))
}

/// Percent-encodes a widget request descriptor
///
/// Same as [`encode_request`], but the related-searches endpoint also
/// wants commas left literal.
pub fn encode_widget_request<T: Serialize>(payload: &T) -> CodecResult<String> {
    Ok(encode_request(payload)?.replace("%2C", ","))
}

/// Strips the anti-scraping prefix and parses the remainder as JSON
///
/// The upstream prepends `)]}'` (sometimes followed by a comma) and a
/// newline to every JSON body. A body without the prefix, or whose
/// remainder is not valid JSON, fails with [`CodecError::MalformedEnvelope`].
pub fn decode_envelope(raw: &[u8]) -> CodecResult<serde_json::Value> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| CodecError::MalformedEnvelope(format!("body is not UTF-8: {}", e)))?;

    let stripped = text.strip_prefix(ENVELOPE_PREFIX).ok_or_else(|| {
        CodecError::MalformedEnvelope(format!(
            "missing {:?} prefix (body starts with {:?})",
            ENVELOPE_PREFIX,
            text.chars().take(8).collect::<String>()
        ))
    })?;

    // Some endpoints emit `)]}',` before the newline
    let body = stripped.trim_start_matches(',').trim_start();

    serde_json::from_str(body)
        .map_err(|e| CodecError::MalformedEnvelope(format!("invalid JSON after prefix: {}", e)))
}
