//! Trend record value objects
//!
//! A `TrendStub` is the partially-populated record produced by extraction;
//! an `EnrichedRecord` adds the ranked related-topic lists and is the
//! pipeline's terminal output unit. Record identity is the source row
//! position, not the title; listing titles are not unique.

use crate::model::TrendStatus;
use serde::{Deserialize, Serialize};

/// Session artifacts captured from the live rendering session
///
/// Captured once per extraction run, immediately after the initial page
/// load, and copied by value into every stub. Workers only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionArtifacts {
    /// Cookie name/value pairs from the rendering session
    pub cookies: Vec<(String, String)>,

    /// User agent string the rendering session reports
    pub user_agent: String,
}

impl SessionArtifacts {
    /// Formats the cookies as a single `Cookie` header value
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One news article associated with a trend
///
/// Fields are best-effort; an unreadable field is an empty string.
/// Display order is preserved and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub source: String,
    /// Relative publication time as shown in the listing (e.g. "3 hours ago")
    pub published_at: String,
}

/// A trend record as extracted from the listing, before enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStub {
    /// Zero-based source row position across all pages; the record's identity
    pub position: usize,

    /// Canonical title, read from the detail panel heading
    pub title: String,

    /// Raw search volume text (e.g. "200K+"); empty when unreadable
    pub search_volume: String,

    /// Volume delta text (e.g. "1,000%"); empty when unreadable
    pub search_volume_delta: String,

    /// When the trend started, as shown in the listing
    pub started: String,

    pub status: TrendStatus,

    /// Related query strings in display order
    pub queries: Vec<String>,

    /// Associated articles in display order
    pub articles: Vec<ArticleRef>,

    /// Session snapshot replayed on enrichment requests
    pub session: SessionArtifacts,
}

/// One entry of a ranked related-topic list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTopic {
    /// Opaque upstream entity id
    pub mid: String,

    /// Explore deep-link for this topic
    pub link: String,

    pub title: String,

    /// Upstream topic type label (e.g. "Topic", "Musician")
    #[serde(rename = "type")]
    pub kind: String,

    /// Relative interest value; absent for "Breakout" entries
    pub value: Option<f64>,
}

/// A finished trend record: stub fields plus ranked related-topic lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub position: usize,
    pub title: String,
    pub search_volume: String,
    pub search_volume_delta: String,
    pub started: String,
    pub status: TrendStatus,
    pub queries: Vec<String>,
    pub articles: Vec<ArticleRef>,
    pub explore_topics_rising: Vec<RankedTopic>,
    pub explore_topics_top: Vec<RankedTopic>,
}

impl EnrichedRecord {
    /// Builds a record from a stub and its ranked topic lists
    pub fn from_stub(
        stub: TrendStub,
        rising: Vec<RankedTopic>,
        top: Vec<RankedTopic>,
    ) -> Self {
        Self {
            position: stub.position,
            title: stub.title,
            search_volume: stub.search_volume,
            search_volume_delta: stub.search_volume_delta,
            started: stub.started,
            status: stub.status,
            queries: stub.queries,
            articles: stub.articles,
            explore_topics_rising: rising,
            explore_topics_top: top,
        }
    }

    /// Builds a record with empty topic lists
    ///
    /// Used when enrichment fails entirely: the stub still yields a record
    /// rather than disappearing from the output.
    pub fn without_topics(stub: TrendStub) -> Self {
        Self::from_stub(stub, Vec::new(), Vec::new())
    }
}
