//! Run summary
//!
//! Aggregate counters for one pipeline run, printed at the end and
//! recorded by the sink.

use serde::Serialize;

/// Summary statistics for a pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// RFC 3339 start timestamp
    pub started_at: String,

    /// RFC 3339 finish timestamp, when the run completed
    pub finished_at: Option<String>,

    pub duration_seconds: Option<u64>,

    /// SHA-256 of the configuration that produced this dataset
    pub config_hash: String,

    pub geography: String,

    /// Stubs the extraction walk emitted
    pub trends_extracted: u64,

    /// Records whose enrichment completed
    pub records_enriched: u64,

    /// Records shipped with empty topic lists after a worker failure
    pub records_failed: u64,

    /// Chunks flushed to the sink
    pub chunks_pushed: u64,
}

impl RunSummary {
    /// Creates a new empty run summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records pushed to the sink
    pub fn total_records(&self) -> u64 {
        self.records_enriched + self.records_failed
    }

    /// Share of records that enriched successfully, as a percentage
    pub fn enrichment_rate(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            return 0.0;
        }
        (self.records_enriched as f64 / total as f64) * 100.0
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Run Summary ===\n");

    println!("Geography: {}", summary.geography);
    println!("Started:   {}", summary.started_at);
    if let Some(finished) = &summary.finished_at {
        println!("Finished:  {}", finished);
    }
    if let Some(duration) = summary.duration_seconds {
        println!("Duration:  {}s", duration);
    }
    println!();

    println!("Trends extracted:  {}", summary.trends_extracted);
    println!("Records enriched:  {}", summary.records_enriched);
    println!("Records degraded:  {}", summary.records_failed);
    println!("Chunks pushed:     {}", summary.chunks_pushed);
    println!();

    println!(
        "Enrichment rate: {:.1}% ({} / {} records)",
        summary.enrichment_rate(),
        summary.records_enriched,
        summary.total_records()
    );
}
