use crate::config::types::{
    Config, ContentConfig, DateRangeConfig, FetcherConfig, PacingConfig, SearchConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_content_config(&config.content)?;
    validate_dates(&config.dates)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_pacing_config(&config.pacing)?;

    if config.browser.page_load_timeout == 0 {
        return Err(ConfigError::Validation(
            "page_load_timeout must be >= 1s".to_string(),
        ));
    }

    if config.output.folder.is_empty() {
        return Err(ConfigError::Validation(
            "output folder cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use HTTP(S)",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.required_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one required search keyword is needed".to_string(),
        ));
    }

    validate_keywords("required search keyword", &config.required_keywords)?;
    validate_keywords("optional search keyword", &config.optional_keywords)?;

    if config.max_pages < 1 || config.max_pages > 50 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 50, got {}",
            config.max_pages
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates content keywords
fn validate_content_config(config: &ContentConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one content keyword is needed".to_string(),
        ));
    }

    validate_keywords("content keyword", &config.keywords)?;

    // Keywords become report columns
    for (i, keyword) in config.keywords.iter().enumerate() {
        if config.keywords[..i].contains(keyword) {
            return Err(ConfigError::InvalidKeyword(format!(
                "content keyword '{}' is listed twice",
                keyword
            )));
        }
        if matches!(keyword.as_str(), "date" | "url quantity" | "urls") {
            return Err(ConfigError::InvalidKeyword(format!(
                "content keyword '{}' collides with a report column",
                keyword
            )));
        }
    }

    Ok(())
}

fn validate_keywords(kind: &str, keywords: &[String]) -> Result<(), ConfigError> {
    for keyword in keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::InvalidKeyword(format!("{} cannot be blank", kind)));
        }
    }
    Ok(())
}

fn validate_dates(dates: &DateRangeConfig) -> Result<(), ConfigError> {
    if dates.from > dates.to {
        return Err(ConfigError::Validation(format!(
            "from date {} is after to date {}",
            dates.from, dates.to
        )));
    }
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "fetcher timeout must be >= 1s".to_string(),
        ));
    }

    if config.concurrency < 1 || config.concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "fetcher concurrency must be between 1 and 32, got {}",
            config.concurrency
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    for (name, [min, max]) in [
        ("between_pages", config.between_pages),
        ("restart_cooldown", config.restart_cooldown),
        ("renavigate_cooldown", config.renavigate_cooldown),
        ("between_days", config.between_days),
    ] {
        if min > max {
            return Err(ConfigError::Validation(format!(
                "pacing {} range is inverted: [{}, {}]",
                name, min, max
            )));
        }
    }
    Ok(())
}
