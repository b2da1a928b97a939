use crate::config::types::{Config, CrawlerConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    if config.max_listing_pages < 1 || config.max_listing_pages > 100 {
        return Err(ConfigError::Validation(format!(
            "max_listing_pages must be between 1 and 100, got {}",
            config.max_listing_pages
        )));
    }

    if config.max_item_retries > 50 {
        return Err(ConfigError::Validation(format!(
            "max_item_retries must be <= 50, got {}",
            config.max_item_retries
        )));
    }

    if config.rate_limit_floor_secs > 3600 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_floor_secs must be <= 3600, got {}",
            config.rate_limit_floor_secs
        )));
    }

    if config.rate_limit_padding_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_padding_secs must be <= 60, got {}",
            config.rate_limit_padding_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates that every listing selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("title", &config.title),
        ("url", &config.url),
        ("submitted", &config.submitted),
        ("score", &config.score),
        ("next", &config.next),
    ] {
        if let Err(e) = Selector::parse(selector) {
            return Err(ConfigError::InvalidSelector(format!(
                "{} selector '{}': {}",
                name, selector, e
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.json_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "json_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
