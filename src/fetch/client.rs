//! HTTP client construction
//!
//! Enrichment requests must not be trivially distinguishable from the
//! rendering session's own traffic, so the client carries a fixed,
//! realistic browser fingerprint: User-Agent, Accept headers, and the
//! Sec-* client hints a desktop Chrome would send.

use crate::config::NetworkConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Fixed desktop Chrome user agent used when no session agent is available
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Builds the fixed browser-fingerprint header set
fn fingerprint_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Not)A;Brand\";v=\"99\", \"Google Chrome\";v=\"127\", \"Chromium\";v=\"127\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers
}

/// Builds an HTTP client for enrichment traffic
///
/// Redirects are not followed: a 301 is a terminal "no data" signal that
/// the fetcher must see, not chase.
///
/// # Arguments
///
/// * `config` - Network configuration (timeout, optional proxy)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &NetworkConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .default_headers(fingerprint_headers())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true);

    if config.use_proxy {
        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
    }

    builder.build()
}
