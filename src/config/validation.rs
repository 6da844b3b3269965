use crate::config::types::{Config, JobConfig, NetworkConfig, OutputConfig, RendererConfig};
use crate::config::OutputFormat;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_job_config(&config.job)?;
    validate_network_config(&config.network)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates job configuration
fn validate_job_config(config: &JobConfig) -> Result<(), ConfigError> {
    if config.geography.is_empty() || config.geography.len() > 3 {
        return Err(ConfigError::Validation(format!(
            "geography must be a 2-3 letter code, got '{}'",
            config.geography
        )));
    }

    if !config.geography.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "geography must be uppercase ASCII letters, got '{}'",
            config.geography
        )));
    }

    if config.language.is_empty()
        || !config
            .language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "language must be a BCP 47-style tag (e.g. 'en-US'), got '{}'",
            config.language
        )));
    }

    if config.max_items < 1 {
        return Err(ConfigError::Validation(format!(
            "max_items must be >= 1, got {}",
            config.max_items
        )));
    }

    Ok(())
}

/// Validates network configuration
fn validate_network_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if config.max_parallel < 1 || config.max_parallel > 16 {
        return Err(ConfigError::Validation(format!(
            "max_parallel must be between 1 and 16, got {}",
            config.max_parallel
        )));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(format!(
            "chunk_size must be >= 1, got {}",
            config.chunk_size
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.use_proxy {
        let proxy_url = config.proxy_url.as_ref().ok_or_else(|| {
            ConfigError::Validation("use_proxy is set but proxy_url is missing".to_string())
        })?;
        Url::parse(proxy_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_url: {}", e)))?;
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.webdriver_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid webdriver_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "webdriver_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_load_wait_secs < 1 {
        return Err(ConfigError::Validation(
            "page_load_wait_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.format {
        OutputFormat::Jsonl => {
            if config.records_path.is_empty() {
                return Err(ConfigError::Validation(
                    "records_path cannot be empty for jsonl output".to_string(),
                ));
            }
        }
        OutputFormat::Sqlite => {
            if config.database_path.is_empty() {
                return Err(ConfigError::Validation(
                    "database_path cannot be empty for sqlite output".to_string(),
                ));
            }
        }
    }

    Ok(())
}
