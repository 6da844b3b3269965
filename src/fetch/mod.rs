//! HTTP fetching for enrichment requests
//!
//! This module handles all raw HTTP traffic against the upstream API,
//! including:
//! - Building HTTP clients with a realistic browser fingerprint
//! - Classifying responses into terminal and retryable outcomes
//! - Bounded exponential-backoff retry for transient failures

mod client;
mod fetcher;
mod retry;

pub use client::build_http_client;
pub use fetcher::{FetchError, FetchOutcome, Fetcher};
pub use retry::RetryConfig;
