use crate::config::types::{Config, CrawlerConfig, SiteConfig, UserAgentConfig};
use crate::url::Site;
use crate::ConfigError;

/// Upper bound for concurrent workers
const MAX_WORKERS: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the seed URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.seed.trim().is_empty() {
        return Err(ConfigError::Validation("seed cannot be empty".to_string()));
    }

    Site::parse(&config.seed).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed, e))
    })?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // robots.txt matching only understands a bare product token
    if config.robot.is_empty() {
        return Err(ConfigError::Validation(
            "robot user agent cannot be empty".to_string(),
        ));
    }

    if !config
        .robot
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "robot user agent must contain only letters, digits, '-' and '_', got '{}'",
            config.robot
        )));
    }

    if config.browser.trim().is_empty() {
        return Err(ConfigError::Validation(
            "browser user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
