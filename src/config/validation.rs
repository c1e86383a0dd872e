use crate::config::types::{ApiConfig, Config, OutputConfig, PagingConfig};
use crate::ConfigError;
use url::Url;

/// Largest page the wall endpoint serves in one call
const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound for the file operation limiter
const MAX_OPEN_FILES: usize = 4096;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_paging_config(&config.paging)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates paging configuration
fn validate_paging_config(config: &PagingConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.discovery_count < 1 || config.discovery_count > config.page_size {
        return Err(ConfigError::Validation(format!(
            "discovery-count must be between 1 and page-size ({}), got {}",
            config.page_size, config.discovery_count
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache-dir cannot be empty".to_string(),
        ));
    }

    if config.result_dir.is_empty() {
        return Err(ConfigError::Validation(
            "result-dir cannot be empty".to_string(),
        ));
    }

    if config.max_open_files < 1 || config.max_open_files > MAX_OPEN_FILES {
        return Err(ConfigError::Validation(format!(
            "max-open-files must be between 1 and {}, got {}",
            MAX_OPEN_FILES, config.max_open_files
        )));
    }

    Ok(())
}
