//! Sink trait and output error types

use crate::model::EnrichedRecord;
use crate::output::RunSummary;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Append-only sink for finished records
///
/// The pipeline calls `push` once per record in extraction order and
/// `flush` after each chunk; implementations must not reorder or
/// deduplicate what they are given.
pub trait Sink: Send {
    /// Appends one finished record
    fn push(&mut self, record: &EnrichedRecord) -> OutputResult<()>;

    /// Makes everything pushed so far durable
    ///
    /// Called after each chunk: a crash mid-run must leave all previously
    /// flushed chunks readable.
    fn flush(&mut self) -> OutputResult<()>;

    /// Records the run summary and closes the sink
    fn finalize(&mut self, summary: &RunSummary) -> OutputResult<()>;
}
