//! Record enrichment against the upstream explore API
//!
//! This module turns trend stubs into finished records:
//! - `worker` performs the two-step explore / related-searches exchange
//!   for one stub, degrading failures to empty topic lists
//! - `dispatcher` fans workers out over a chunk of stubs with bounded
//!   parallelism, isolating per-item failures

mod dispatcher;
mod worker;

pub use dispatcher::{run_all, EnrichError, Worker, WorkerOutcome};
pub use worker::EnrichmentWorker;
