//! Greylit: a multi-source grey literature search aggregator
//!
//! This crate queries one canonical, paginated search endpoint together with any
//! number of configured satellite listings, estimates how many results are on
//! offer, then pages through every source in rounds, merging and deduplicating
//! the extracted records until the requested number has been collected.

pub mod config;
pub mod engine;
pub mod extract;
pub mod output;
pub mod pagination;
pub mod query;
pub mod source;
pub mod url;

use thiserror::Error;

/// Main error type for Greylit operations
#[derive(Debug, Error)]
pub enum GreyLitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] engine::FetchError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Pagination error: {0}")]
    Pagination(#[from] pagination::PaginationError),

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Greylit operations
pub type Result<T> = std::result::Result<T, GreyLitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::{run_search, search, SearchOutcome, SearchReport};
pub use extract::{Attribution, ResultItem};
pub use query::{AggregationRequest, SearchParams, SortOrder};
pub use source::SourceDescriptor;
