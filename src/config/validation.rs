use crate::config::types::{AccessConfig, Config, HttpConfig, SiteConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_workers("harvest", config.harvest.workers)?;
    validate_workers("scrape", config.scrape.workers)?;
    validate_storage_config(&config.storage)?;
    validate_access_config(&config.access)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.currency_code.trim().is_empty() {
        return Err(ConfigError::Validation(
            "currency-code cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates a stage's worker pool size
fn validate_workers(stage: &str, workers: u32) -> Result<(), ConfigError> {
    if !(1..=100).contains(&workers) {
        return Err(ConfigError::Validation(format!(
            "{}.workers must be between 1 and 100, got {}",
            stage, workers
        )));
    }
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.input_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "input-dir cannot be empty".to_string(),
        ));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_access_config(config: &AccessConfig) -> Result<(), ConfigError> {
    if config.free_page_limit < 1 {
        return Err(ConfigError::Validation(
            "free-page-limit must be >= 1".to_string(),
        ));
    }

    if let Some(passcode) = &config.passcode {
        if passcode.trim().is_empty() {
            return Err(ConfigError::Validation(
                "passcode cannot be blank; omit it to disable unlocking".to_string(),
            ));
        }
    }

    Ok(())
}
