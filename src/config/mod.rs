//! Configuration module for trendlens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use trendlens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Extracting up to {} trends", config.job.max_items);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, JobConfig, NetworkConfig, OutputConfig, OutputFormat, RendererConfig, SortOrder,
    StatusFilter,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
