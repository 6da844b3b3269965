//! Pipeline orchestration
//!
//! This module sequences the whole run: extraction drives the Renderer to
//! completion first, then enrichment fans out over fixed-size chunks, and
//! each chunk's records stream to the sink before the next chunk starts.

mod orchestrator;

pub use orchestrator::Orchestrator;
