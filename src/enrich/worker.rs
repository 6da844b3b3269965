//! Enrichment worker
//!
//! One worker call performs the upstream's two-step exchange:
//! 1. POST the explore endpoint with the stub's title to obtain a widget
//!    descriptor and bearer token
//! 2. GET the related-searches endpoint with the re-encoded descriptor
//!    and token, then read the two ranked lists positionally
//!
//! The ranked-list index convention is upstream-defined: index 0 is
//! "top", index 1 is "rising". Any step failure degrades the output to
//! empty lists; `enrich` itself never fails. Workers share no mutable
//! state - each owns its fetcher, and the session snapshot is read-only.

use crate::codec::{self, CodecError, ExploreRequest};
use crate::config::{JobConfig, NetworkConfig};
use crate::enrich::{EnrichError, Worker};
use crate::fetch::{FetchError, FetchOutcome, Fetcher};
use crate::model::{EnrichedRecord, RankedTopic, TrendStub};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Widget index of the related-searches descriptor in the explore response
const RELATED_SEARCHES_WIDGET: usize = 2;

/// Ranked list indices; positional by upstream convention
const RANKED_LIST_TOP: usize = 0;
const RANKED_LIST_RISING: usize = 1;

/// Failures internal to one enrichment step
#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("explore response missing {0}")]
    MissingField(&'static str),
}

/// Enriches trend stubs with related-topic data
#[derive(Clone)]
pub struct EnrichmentWorker {
    fetcher: Fetcher,
    base_url: String,
    geography: String,
    language: String,
    verbose: bool,
}

impl EnrichmentWorker {
    pub fn new(fetcher: Fetcher, network: &NetworkConfig, job: &JobConfig) -> Self {
        Self {
            fetcher,
            base_url: network.base_url.trim_end_matches('/').to_string(),
            geography: job.geography.clone(),
            language: job.language.clone(),
            verbose: job.verbose,
        }
    }

    /// Enriches one stub into a finished record
    ///
    /// Never fails: a stub whose enrichment breaks at any step still
    /// yields a record, with the affected lists empty.
    pub async fn enrich(&self, stub: TrendStub) -> EnrichedRecord {
        let (rising, top) = match self.fetch_related_topics(&stub).await {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!(
                    position = stub.position,
                    title = %stub.title,
                    error = %e,
                    "enrichment degraded to empty topic lists"
                );
                (Vec::new(), Vec::new())
            }
        };
        EnrichedRecord::from_stub(stub, rising, top)
    }

    /// Runs the two-step exchange for one stub
    async fn fetch_related_topics(
        &self,
        stub: &TrendStub,
    ) -> Result<(Vec<RankedTopic>, Vec<RankedTopic>), StepError> {
        // Step 1: explore - yields the widget descriptor and token
        let request = ExploreRequest::for_keyword(&stub.title, &self.geography);
        let encoded = codec::encode_request(&request)?;
        let explore_url = format!(
            "{}/trends/api/explore?hl={}&tz=-60&req={}&tz=-120",
            self.base_url, self.language, encoded
        );
        tracing::debug!(position = stub.position, url = %explore_url, "explore request");

        let outcome = self
            .fetcher
            .fetch(Method::POST, &explore_url, Some(&stub.session))
            .await?;
        let FetchOutcome::Body(body) = outcome else {
            // Upstream says there is no data for this keyword; not an error
            tracing::debug!(position = stub.position, "explore returned no data");
            return Ok((Vec::new(), Vec::new()));
        };

        let envelope = codec::decode_envelope(&body)?;
        let widget = &envelope["widgets"][RELATED_SEARCHES_WIDGET];
        let descriptor = widget
            .get("request")
            .ok_or(StepError::MissingField("widget request descriptor"))?;
        let token = widget["token"]
            .as_str()
            .ok_or(StepError::MissingField("widget token"))?;

        if self.verbose {
            tracing::debug!(
                user_type = %descriptor["userConfig"]["userType"],
                "explore widget user config"
            );
        }

        // Step 2: related searches - commas stay literal in this encoding
        let encoded = codec::encode_widget_request(descriptor)?;
        let widget_url = format!(
            "{}/trends/api/widgetdata/relatedsearches?hl={}&tz=-60&req={}&token={}",
            self.base_url, self.language, encoded, token
        );
        tracing::debug!(position = stub.position, url = %widget_url, "related searches request");

        let outcome = self
            .fetcher
            .fetch(Method::GET, &widget_url, Some(&stub.session))
            .await?;
        let FetchOutcome::Body(body) = outcome else {
            tracing::debug!(position = stub.position, "related searches returned no data");
            return Ok((Vec::new(), Vec::new()));
        };

        let payload = codec::decode_envelope(&body)?;
        if self.verbose {
            tracing::debug!(payload = %payload, "related searches payload");
        }

        let rising = parse_ranked_list(&payload, RANKED_LIST_RISING);
        let top = parse_ranked_list(&payload, RANKED_LIST_TOP);
        Ok((rising, top))
    }
}

#[async_trait]
impl Worker for EnrichmentWorker {
    async fn enrich(&self, stub: TrendStub) -> Result<EnrichedRecord, EnrichError> {
        Ok(EnrichmentWorker::enrich(self, stub).await)
    }
}

/// Reads one ranked list out of the decoded related-searches payload
///
/// A missing list degrades to empty; individual entries without a topic
/// object are skipped. Rank order is preserved.
fn parse_ranked_list(payload: &Value, index: usize) -> Vec<RankedTopic> {
    let entries = match payload["default"]["rankedList"]
        .get(index)
        .and_then(|list| list["rankedKeyword"].as_array())
    {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries
        .iter()
        .filter_map(|entry| {
            let topic = entry.get("topic")?;
            Some(RankedTopic {
                mid: topic["mid"].as_str()?.to_string(),
                link: entry["link"].as_str().unwrap_or("").to_string(),
                title: topic["title"].as_str()?.to_string(),
                kind: topic["type"].as_str().unwrap_or("").to_string(),
                value: entry["value"].as_f64(),
            })
        })
        .collect()
}
