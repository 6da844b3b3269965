use crate::fetch::RetryConfig;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for trendlens
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub job: JobConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    SearchVolume,
    Recency,
    Relevance,
    Title,
}

impl SortOrder {
    /// Query parameter value for the listing URL
    pub fn as_query_param(&self) -> &'static str {
        match self {
            Self::SearchVolume => "search-volume",
            Self::Recency => "recency",
            Self::Relevance => "relevance",
            Self::Title => "title",
        }
    }
}

/// Listing status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    Active,
    All,
}

impl StatusFilter {
    /// Query parameter value for the listing URL
    pub fn as_query_param(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::All => "all",
        }
    }
}

/// What to extract and enrich
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Two-letter geography code (e.g. "US")
    pub geography: String,

    /// Interface language (e.g. "en-US"); also sent on API requests
    pub language: String,

    #[serde(rename = "sort-order", default = "default_sort_order")]
    pub sort_order: SortOrder,

    #[serde(rename = "status-filter", default = "default_status_filter")]
    pub status_filter: StatusFilter,

    /// Overall cap on extracted trends; extraction stops mid-page if needed
    #[serde(rename = "max-items", default = "default_max_items")]
    pub max_items: usize,

    /// Log raw decoded enrichment payloads for diagnosis
    #[serde(default)]
    pub verbose: bool,
}

impl JobConfig {
    /// Builds the listing URL for this job
    pub fn listing_url(&self, base_url: &str) -> String {
        format!(
            "{}/trending?geo={}&hl={}&sort={}&status={}",
            base_url.trim_end_matches('/'),
            self.geography,
            self.language,
            self.sort_order.as_query_param(),
            self.status_filter.as_query_param(),
        )
    }
}

/// Network behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Upstream base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum concurrently in-flight enrichment requests
    #[serde(rename = "max-parallel")]
    pub max_parallel: usize,

    /// Records per chunk pushed to the sink before the next chunk starts
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    #[serde(rename = "use-proxy")]
    pub use_proxy: bool,

    #[serde(rename = "proxy-url")]
    pub proxy_url: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum retry attempts after the initial request
    #[serde(rename = "retry-max-attempts")]
    pub retry_max_attempts: u32,

    /// Base backoff after a retryable HTTP status (milliseconds)
    #[serde(rename = "status-backoff-ms")]
    pub status_backoff_ms: u64,

    /// Base backoff after a transport failure (milliseconds)
    #[serde(rename = "transport-backoff-ms")]
    pub transport_backoff_ms: u64,

    /// Overall deadline for one record's enrichment (seconds)
    #[serde(rename = "worker-deadline-secs")]
    pub worker_deadline_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://trends.google.com".to_string(),
            max_parallel: 2,
            chunk_size: 50,
            use_proxy: false,
            proxy_url: None,
            request_timeout_secs: 40,
            retry_max_attempts: 8,
            status_backoff_ms: 5_000,
            transport_backoff_ms: 20_000,
            worker_deadline_secs: 600,
        }
    }
}

impl NetworkConfig {
    /// Builds the fetcher retry policy from this configuration
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retry_max_attempts,
            status_backoff: Duration::from_millis(self.status_backoff_ms),
            transport_backoff: Duration::from_millis(self.transport_backoff_ms),
            ..RetryConfig::default()
        }
    }
}

/// Rendering engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// WebDriver endpoint URL
    #[serde(rename = "webdriver-url")]
    pub webdriver_url: String,

    /// How long to wait for the listing to render (seconds)
    #[serde(rename = "page-load-wait-secs")]
    pub page_load_wait_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            page_load_wait_secs: 20,
        }
    }
}

/// Output sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Jsonl,
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Path of the JSONL records file
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Path of the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jsonl,
            records_path: "./trends.jsonl".to_string(),
            database_path: "./trends.db".to_string(),
        }
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::SearchVolume
}

fn default_status_filter() -> StatusFilter {
    StatusFilter::Active
}

fn default_max_items() -> usize {
    25
}
