use crate::config::types::{
    CatalogConfig, Config, HttpConfig, OutputConfig, PipelineConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool size
pub const MAX_WORKER_COUNT: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing URL and site origin
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    validate_http_url("listing-url", &config.listing_url)?;
    validate_http_url("site-origin", &config.site_origin)?;
    Ok(())
}

/// Validates worker pool settings
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.worker_count < 1 || config.worker_count > MAX_WORKER_COUNT {
        return Err(ConfigError::Validation(format!(
            "worker-count must be between 1 and {}, got {}",
            MAX_WORKER_COUNT, config.worker_count
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue-capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = config.contact_url.as_deref().filter(|u| !u.is_empty()) {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates HTTP timeouts
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.bulk_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "bulk-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses `value` and requires an http or https scheme
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_worker_count_bounds() {
        let mut config = Config::default();

        config.pipeline.worker_count = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.pipeline.worker_count = MAX_WORKER_COUNT + 1;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.pipeline.worker_count = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_queue_capacity() {
        let mut config = Config::default();
        config.pipeline.queue_capacity = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("listing-url", "https://example.com/chart/").is_ok());
        assert!(validate_http_url("listing-url", "http://127.0.0.1:8080/").is_ok());

        assert!(matches!(
            validate_http_url("listing-url", "not a url"),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_http_url("listing-url", "ftp://example.com/"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = Some(String::new());
        assert!(validate(&config).is_ok());

        config.user_agent.contact_url = Some("nope".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_empty_bulk_path() {
        let mut config = Config::default();
        config.output.bulk_path = "  ".to_string();
        assert!(validate(&config).is_err());
    }
}
