//! SQLite sink
//!
//! Records land in an append-only `records` table, one row per record
//! with the full JSON payload; each run gets a row in `runs` carrying the
//! config hash. WAL mode keeps previously committed chunks readable if
//! the process dies mid-run.

use crate::model::EnrichedRecord;
use crate::output::traits::{OutputResult, Sink};
use crate::output::RunSummary;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the records database
const SCHEMA_SQL: &str = r#"
-- Track pipeline runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    geography TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Finished records, append-only
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_run ON records(run_id);
CREATE INDEX IF NOT EXISTS idx_records_position ON records(run_id, position);
"#;

/// Sink writing records to a SQLite database
pub struct SqliteSink {
    conn: Connection,
    run_id: i64,
}

impl SqliteSink {
    /// Opens (or creates) the database and starts a new run
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the configuration producing this run
    /// * `geography` - Geography code of the run
    pub fn create(path: &Path, config_hash: &str, geography: &str) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        Self::with_connection(conn, config_hash, geography)
    }

    /// Creates an in-memory sink (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::with_connection(conn, "test_hash", "US")
    }

    fn with_connection(
        conn: Connection,
        config_hash: &str,
        geography: &str,
    ) -> OutputResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (started_at, config_hash, geography, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, geography, "running"],
        )?;
        let run_id = conn.last_insert_rowid();

        Ok(Self { conn, run_id })
    }

    /// Number of records stored for the current run
    pub fn record_count(&self) -> OutputResult<u64> {
        let count: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE run_id = ?1",
            params![self.run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl Sink for SqliteSink {
    fn push(&mut self, record: &EnrichedRecord) -> OutputResult<()> {
        let payload = serde_json::to_string(record)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO records (run_id, position, title, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![self.run_id, record.position as i64, record.title, payload, now],
        )?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        // Each insert commits on its own; nothing buffered to flush
        Ok(())
    }

    fn finalize(&mut self, summary: &RunSummary) -> OutputResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET finished_at = ?1, status = ?2 WHERE id = ?3",
            params![now, "completed", self.run_id],
        )?;
        tracing::info!(
            run_id = self.run_id,
            records = summary.total_records(),
            "run recorded"
        );
        Ok(())
    }
}
