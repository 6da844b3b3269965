//! Resilient fetcher implementation
//!
//! Response classification follows the upstream's observed behavior:
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 404 or 301 | Terminal success, empty payload ("no data") |
//! | HTTP < 300 | Terminal success, body returned |
//! | Any other status | Retry with status backoff |
//! | Transport failure | Retry with transport backoff |
//!
//! Retries are bounded by [`RetryConfig::max_attempts`]; exhausting them
//! surfaces [`FetchError::RetriesExhausted`] to the caller.

use crate::fetch::RetryConfig;
use crate::model::SessionArtifacts;
use reqwest::header::{CONTENT_TYPE, COOKIE, ORIGIN, USER_AGENT};
use reqwest::{Client, Method};
use thiserror::Error;

/// Errors surfaced by the fetcher after retries are spent
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("retries exhausted after {attempts} attempts for {url}: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Successful response body
    Body(Vec<u8>),

    /// Upstream reported "no data" (404 or 301) - not an error
    Empty { status: u16 },
}

impl FetchOutcome {
    /// Returns the body bytes, or an empty slice for the no-data outcome
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Body(bytes) => bytes,
            Self::Empty { .. } => &[],
        }
    }
}

/// Issues HTTP requests against the upstream API with bounded retry
///
/// The fetcher is cheap to clone; each enrichment worker owns one.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryConfig,
}

impl Fetcher {
    pub fn new(client: Client, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Fetches a URL, retrying transient failures until a terminal outcome
    ///
    /// Session cookies and user agent are attached when available so the
    /// request replays the rendering session's identity.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method (the explore endpoint is POST, widget data GET)
    /// * `url` - Fully-formed request URL
    /// * `session` - Captured session artifacts, if any
    pub async fn fetch(
        &self,
        method: Method,
        url: &str,
        session: Option<&SessionArtifacts>,
    ) -> Result<FetchOutcome, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(method.clone(), url, session).await {
                SendResult::Done(outcome) => {
                    if attempt > 0 {
                        tracing::info!(url, attempts = attempt + 1, "fetch succeeded after retry");
                    }
                    return Ok(outcome);
                }
                SendResult::RetryableStatus(status) => {
                    attempt += 1;
                    if attempt > self.retry.max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last_error: format!("HTTP {}", status),
                        });
                    }
                    let delay = self.retry.delay_for(self.retry.status_backoff, attempt);
                    tracing::warn!(url, status, attempt, delay_ms = delay.as_millis() as u64, "retryable status");
                    tokio::time::sleep(delay).await;
                }
                SendResult::TransportError(error) => {
                    attempt += 1;
                    if attempt > self.retry.max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last_error: error,
                        });
                    }
                    let delay = self.retry.delay_for(self.retry.transport_backoff, attempt);
                    tracing::warn!(url, error, attempt, delay_ms = delay.as_millis() as u64, "transport failure");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Issues one request and classifies the result
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        session: Option<&SessionArtifacts>,
    ) -> SendResult {
        let mut request = self.client.request(method.clone(), url);

        // Same-origin fingerprint: the browser always sends Origin on these calls
        if let Ok(parsed) = url::Url::parse(url) {
            request = request.header(ORIGIN, parsed.origin().ascii_serialization());
        }
        if method == Method::POST {
            request = request.header(CONTENT_TYPE, "application/json;charset=UTF-8");
        }
        if let Some(session) = session {
            if !session.cookies.is_empty() {
                request = request.header(COOKIE, session.cookie_header());
            }
            if !session.user_agent.is_empty() {
                request = request.header(USER_AGENT, &session.user_agent);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return SendResult::TransportError(describe_transport_error(&e)),
        };

        let status = response.status().as_u16();
        if status == 404 || status == 301 {
            return SendResult::Done(FetchOutcome::Empty { status });
        }
        if status < 300 {
            return match response.bytes().await {
                Ok(bytes) => SendResult::Done(FetchOutcome::Body(bytes.to_vec())),
                // A body cut off mid-read is a transport fault, not a status fault
                Err(e) => SendResult::TransportError(describe_transport_error(&e)),
            };
        }

        SendResult::RetryableStatus(status)
    }
}

/// Internal per-attempt classification
enum SendResult {
    Done(FetchOutcome),
    RetryableStatus(u16),
    TransportError(String),
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    }
}
