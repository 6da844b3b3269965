//! JSONL file sink
//!
//! One JSON object per line, appended in push order. This is the default
//! sink; the file is readable mid-run after every chunk flush.

use crate::model::EnrichedRecord;
use crate::output::traits::{OutputResult, Sink};
use crate::output::RunSummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing one JSON record per line
pub struct JsonlSink {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl JsonlSink {
    /// Creates (or truncates) the records file at the given path
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            records_written: 0,
        })
    }
}

impl Sink for JsonlSink {
    fn push(&mut self, record: &EnrichedRecord) -> OutputResult<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", line)?;
        self.records_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn finalize(&mut self, summary: &RunSummary) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::info!(
            path = %self.path.display(),
            records = self.records_written,
            enriched = summary.records_enriched,
            "records written"
        );
        Ok(())
    }
}
