use crate::config::types::{CanonicalConfig, ClientConfig, Config, SearchConfig};
use crate::extract::Department;
use crate::pagination::PaginationScheme;
use crate::source::SourceDescriptor;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_search_config(&config.search)?;
    validate_canonical_config(&config.canonical)?;
    validate_departments(&config.departments)?;
    validate_sources(&config.sources, &config.departments)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates aggregation settings
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 32 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 32, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.max_count_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-count-pages must be >= 1, got {}",
            config.max_count_pages
        )));
    }

    if config.max_failed_fetches < 1 {
        return Err(ConfigError::Validation(format!(
            "max-failed-fetches must be >= 1, got {}",
            config.max_failed_fetches
        )));
    }

    Ok(())
}

/// Validates the canonical endpoint
fn validate_canonical_config(config: &CanonicalConfig) -> Result<(), ConfigError> {
    validate_http_url("canonical base-url", &config.base_url)?;

    if !config.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "canonical search-path must start with '/', got '{}'",
            config.search_path
        )));
    }

    Ok(())
}

/// Validates the known organisation list
fn validate_departments(departments: &[Department]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for department in departments {
        if department.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "department title cannot be empty".to_string(),
            ));
        }

        if !seen.insert(department.title.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate department '{}'",
                department.title
            )));
        }

        validate_http_url(&format!("link of '{}'", department.title), &department.link)?;

        if department.slug().is_empty() {
            return Err(ConfigError::InvalidUrl(format!(
                "link of '{}' has no organisation path segment",
                department.title
            )));
        }
    }

    let slugs: HashSet<&str> = departments.iter().map(|d| d.slug()).collect();
    for department in departments {
        for slug in &department.works_with {
            if slug == department.slug() {
                return Err(ConfigError::Validation(format!(
                    "'{}' cannot work with itself",
                    department.title
                )));
            }
            if !slugs.contains(slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "'{}' works with unknown organisation '{}'",
                    department.title, slug
                )));
            }
        }
    }

    Ok(())
}

/// Validates satellite source descriptors
fn validate_sources(
    sources: &[SourceDescriptor],
    departments: &[Department],
) -> Result<(), ConfigError> {
    let titles: HashSet<&str> = departments.iter().map(|d| d.title.as_str()).collect();
    let mut names = HashSet::new();

    for source in sources {
        validate_source(source)?;

        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source name '{}'",
                source.name
            )));
        }

        if !titles.contains(source.title.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Source '{}' belongs to unknown department '{}'",
                source.name, source.title
            )));
        }
    }

    Ok(())
}

/// Validates a single satellite source descriptor
fn validate_source(source: &SourceDescriptor) -> Result<(), ConfigError> {
    if source.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    validate_http_url(&format!("base-url of '{}'", source.name), &source.base_url)?;
    validate_http_url(
        &format!("search URL of '{}'", source.name),
        &format!("{}{}", source.base_url, source.search_path),
    )?;

    if source.search_query_key.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Source '{}' must set search-query-key",
            source.name
        )));
    }

    if let Some(param) = &source.initial_page {
        if param.key.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source '{}' has an initial-page parameter without a key",
                source.name
            )));
        }
    }

    if source.pagination.delta() == 0 {
        return Err(ConfigError::Validation(format!(
            "Source '{}' pagination delta must be nonzero",
            source.name
        )));
    }

    if let PaginationScheme::MarkerIncrement { marker, .. } = &source.pagination {
        if marker.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Source '{}' pagination marker cannot be empty",
                source.name
            )));
        }
    }

    Ok(())
}

/// Validates that a string is an absolute HTTP(S) URL
fn validate_http_url(what: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            what, value
        )));
    }

    Ok(())
}
