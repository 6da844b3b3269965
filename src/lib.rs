//! Trendlens: a trend discovery and enrichment pipeline
//!
//! This crate walks a dynamically rendered trending listing through a
//! narrow Renderer capability, assembles one stub per listed trend, and
//! enriches each stub with ranked related-topic data from the upstream
//! explore API, streaming normalized records to a sink.

pub mod codec;
pub mod config;
pub mod enrich;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod renderer;

use thiserror::Error;

/// Main error type for trendlens operations
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Renderer error: {0}")]
    Renderer(#[from] renderer::RendererError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] codec::CodecError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for trendlens operations
pub type Result<T> = std::result::Result<T, TrendError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ArticleRef, EnrichedRecord, RankedTopic, SessionArtifacts, TrendStatus, TrendStub};
pub use pipeline::Orchestrator;
pub use renderer::{Renderer, WebDriverRenderer};
