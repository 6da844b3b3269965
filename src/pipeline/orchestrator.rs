//! Pipeline orchestrator
//!
//! Sequencing and memory bounds:
//! 1. Extract stubs up to the configured cap (exclusive Renderer access)
//! 2. Split into fixed-size chunks
//! 3. Per chunk: dispatch enrichment with bounded parallelism, re-key the
//!    outcomes by source position, push to the sink, flush
//!
//! Streaming per chunk bounds memory to one chunk's records and makes
//! partial progress durable: a crash after chunk N leaves chunks 1..N
//! persisted.

use crate::config::Config;
use crate::enrich::{run_all, EnrichmentWorker};
use crate::extract::{ExtractTiming, TrendExtractor};
use crate::fetch::{build_http_client, Fetcher};
use crate::output::{RunSummary, Sink};
use crate::renderer::Renderer;
use crate::TrendError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Orchestrates extraction, enrichment, and output for one run
pub struct Orchestrator {
    config: Config,
    config_hash: String,
    timing: ExtractTiming,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - Validated run configuration
    /// * `config_hash` - Hash of the configuration file, recorded in the summary
    pub fn new(config: Config, config_hash: String) -> Self {
        let timing = ExtractTiming {
            page_load_wait: Duration::from_secs(config.renderer.page_load_wait_secs),
            ..ExtractTiming::default()
        };
        Self {
            config,
            config_hash,
            timing,
        }
    }

    /// Overrides the extraction settle delays (for tests)
    pub fn with_timing(mut self, timing: ExtractTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Runs the full pipeline
    ///
    /// The Renderer session is quit once extraction finishes; enrichment
    /// only replays the captured session artifacts over raw HTTP.
    ///
    /// # Arguments
    ///
    /// * `renderer` - Live rendering session (owned exclusively until quit)
    /// * `sink` - Destination for finished records
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The run completed; every extracted stub was pushed
    /// * `Err(TrendError)` - The listing never rendered or the sink failed
    pub async fn run<R: Renderer>(
        &self,
        renderer: &mut R,
        sink: &mut dyn Sink,
    ) -> Result<RunSummary, TrendError> {
        let started_at = Utc::now();
        let start_instant = std::time::Instant::now();

        let listing_url = self.config.job.listing_url(&self.config.network.base_url);

        // Phase 1: extraction, single-threaded over the renderer session
        let stubs = {
            let mut extractor =
                TrendExtractor::new(renderer, &self.config.job, self.timing.clone());
            extractor.run(&listing_url).await?
        };

        // The navigation session is done; enrichment replays its cookies
        // over plain HTTP
        if let Err(e) = renderer.quit().await {
            tracing::warn!(error = %e, "failed to quit renderer session");
        }

        let mut summary = RunSummary {
            started_at: started_at.to_rfc3339(),
            config_hash: self.config_hash.clone(),
            geography: self.config.job.geography.clone(),
            trends_extracted: stubs.len() as u64,
            ..RunSummary::new()
        };

        if stubs.is_empty() {
            tracing::warn!("no trends extracted, nothing to enrich");
            summary.finished_at = Some(Utc::now().to_rfc3339());
            summary.duration_seconds = Some(start_instant.elapsed().as_secs());
            sink.finalize(&summary)?;
            return Ok(summary);
        }

        // Phase 2: chunked enrichment
        let network = &self.config.network;
        let client = build_http_client(network)?;
        let fetcher = Fetcher::new(client, network.retry_config());
        let worker = Arc::new(EnrichmentWorker::new(fetcher, network, &self.config.job));
        let deadline = Duration::from_secs(network.worker_deadline_secs);

        let total_chunks = stubs.len().div_ceil(network.chunk_size);
        for (chunk_index, chunk) in stubs.chunks(network.chunk_size).enumerate() {
            tracing::info!(
                chunk = chunk_index + 1,
                total_chunks,
                size = chunk.len(),
                "enriching chunk"
            );

            let mut outcomes = run_all(
                chunk.to_vec(),
                Arc::clone(&worker),
                network.max_parallel,
                deadline,
            )
            .await;

            // Outcomes arrive in completion order; the sink gets them in
            // extraction order
            outcomes.sort_by_key(|outcome| outcome.position());

            for outcome in outcomes {
                if outcome.is_failed() {
                    summary.records_failed += 1;
                } else {
                    summary.records_enriched += 1;
                }
                sink.push(&outcome.into_record())?;
            }
            sink.flush()?;
            summary.chunks_pushed += 1;

            tracing::info!(
                chunk = chunk_index + 1,
                pushed = summary.total_records(),
                total = stubs.len(),
                "chunk persisted"
            );
        }

        summary.finished_at = Some(Utc::now().to_rfc3339());
        summary.duration_seconds = Some(start_instant.elapsed().as_secs());
        sink.finalize(&summary)?;

        tracing::info!(
            extracted = summary.trends_extracted,
            enriched = summary.records_enriched,
            failed = summary.records_failed,
            duration_secs = summary.duration_seconds,
            "pipeline complete"
        );

        Ok(summary)
    }
}

// End-to-end behavior is exercised with a scripted renderer and a mock
// upstream in tests/integration/pipeline_tests.rs
