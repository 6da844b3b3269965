//! Concurrency dispatcher for enrichment workers
//!
//! Fans a worker out over a chunk of stubs with bounded parallelism.
//! Outcomes arrive in completion order; callers needing extraction order
//! re-key by the stub's position, which workers carry through unchanged.
//! A failing or panicking worker costs exactly its own slot - the batch
//! always yields one outcome per input stub.

use crate::model::{EnrichedRecord, TrendStub};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Errors an enrichment worker may surface to the dispatcher
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("enrichment failed: {0}")]
    Failed(String),
}

/// One stub's enrichment, as a capability the dispatcher fans out
///
/// The production implementation is [`crate::enrich::EnrichmentWorker`];
/// tests substitute deliberately failing workers.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn enrich(&self, stub: TrendStub) -> Result<EnrichedRecord, EnrichError>;
}

/// Per-item result of a dispatched batch
#[derive(Debug)]
pub enum WorkerOutcome {
    /// Worker produced a finished record
    Completed(EnrichedRecord),

    /// Worker failed or panicked; the stub is preserved for fallback output
    Failed { stub: TrendStub, error: String },
}

impl WorkerOutcome {
    /// Source row position of the underlying record
    pub fn position(&self) -> usize {
        match self {
            Self::Completed(record) => record.position,
            Self::Failed { stub, .. } => stub.position,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Converts the outcome into a record
    ///
    /// Failures become records with empty topic lists so no stub ever
    /// disappears from the output.
    pub fn into_record(self) -> EnrichedRecord {
        match self {
            Self::Completed(record) => record,
            Self::Failed { stub, .. } => EnrichedRecord::without_topics(stub),
        }
    }
}

/// Runs a worker over a chunk of stubs with bounded parallelism
///
/// At most `max_parallel` enrichments are in flight at once; each is
/// bounded by `deadline` so a wedged upstream cannot stall the batch.
/// Returns outcomes in completion order, exactly one per input stub.
///
/// # Arguments
///
/// * `stubs` - The chunk to enrich
/// * `worker` - Worker shared by all tasks (stateless)
/// * `max_parallel` - Concurrency bound (clamped to at least 1)
/// * `deadline` - Overall per-item time budget
pub async fn run_all<W: Worker + 'static>(
    stubs: Vec<TrendStub>,
    worker: Arc<W>,
    max_parallel: usize,
    deadline: Duration,
) -> Vec<WorkerOutcome> {
    let semaphore = Arc::new(Semaphore::new(max_parallel.max(1)));
    let mut join_set = JoinSet::new();
    let mut pending: HashMap<tokio::task::Id, TrendStub> = HashMap::new();

    for stub in stubs {
        let semaphore = Arc::clone(&semaphore);
        let worker = Arc::clone(&worker);
        let task_stub = stub.clone();

        let handle = join_set.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return WorkerOutcome::Failed {
                        stub: task_stub,
                        error: "dispatcher shut down".to_string(),
                    }
                }
            };

            match tokio::time::timeout(deadline, worker.enrich(task_stub.clone())).await {
                Ok(Ok(record)) => WorkerOutcome::Completed(record),
                Ok(Err(e)) => {
                    tracing::error!(
                        position = task_stub.position,
                        title = %task_stub.title,
                        error = %e,
                        "enrichment worker failed"
                    );
                    WorkerOutcome::Failed {
                        stub: task_stub,
                        error: e.to_string(),
                    }
                }
                Err(_) => {
                    tracing::error!(
                        position = task_stub.position,
                        title = %task_stub.title,
                        deadline_secs = deadline.as_secs(),
                        "enrichment deadline exceeded"
                    );
                    WorkerOutcome::Failed {
                        stub: task_stub,
                        error: format!("deadline of {:?} exceeded", deadline),
                    }
                }
            }
        });
        pending.insert(handle.id(), stub);
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(joined) = join_set.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                outcomes.push(outcome);
            }
            Err(join_error) => {
                // A panicked task still yields an outcome; the stub was
                // kept aside exactly for this
                tracing::error!(error = %join_error, "enrichment task panicked");
                if let Some(stub) = pending.remove(&join_error.id()) {
                    outcomes.push(WorkerOutcome::Failed {
                        stub,
                        error: format!("task panicked: {}", join_error),
                    });
                }
            }
        }
    }

    outcomes
}
