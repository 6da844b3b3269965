//! Output module for record sinks and run summaries
//!
//! This module handles:
//! - The append-only `Sink` interface the pipeline pushes records into
//! - JSONL and SQLite sink implementations
//! - Run summary statistics and reporting

mod jsonl;
mod sqlite;
mod summary;
mod traits;

pub use jsonl::JsonlSink;
pub use sqlite::SqliteSink;
pub use summary::{print_summary, RunSummary};
pub use traits::{OutputError, OutputResult, Sink};

use crate::config::{OutputConfig, OutputFormat};

/// Creates the sink selected by the output configuration
///
/// # Arguments
///
/// * `config` - Output configuration
/// * `config_hash` - Hash of the run's configuration (recorded by SQLite)
/// * `geography` - Geography code of the run
///
/// # Returns
///
/// * `Ok(Box<dyn Sink>)` - Ready-to-use sink
/// * `Err(OutputError)` - Target file or database could not be opened
pub fn create_sink(
    config: &OutputConfig,
    config_hash: &str,
    geography: &str,
) -> OutputResult<Box<dyn Sink>> {
    match config.format {
        OutputFormat::Jsonl => {
            let sink = JsonlSink::create(std::path::Path::new(&config.records_path))?;
            Ok(Box::new(sink))
        }
        OutputFormat::Sqlite => {
            let sink = SqliteSink::create(
                std::path::Path::new(&config.database_path),
                config_hash,
                geography,
            )?;
            Ok(Box::new(sink))
        }
    }
}
