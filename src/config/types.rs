use crate::extract::Department;
use crate::source::SourceDescriptor;
use serde::Deserialize;

/// Main configuration structure for Greylit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub canonical: CanonicalConfig,

    /// Known organisations on the canonical site
    #[serde(default, rename = "department")]
    pub departments: Vec<Department>,

    /// Satellite sources, in activation order
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceDescriptor>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("greylit/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Aggregation behaviour
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum number of item detail pages fetched at once
    pub max_concurrent_requests: u32,

    /// Maximum pages walked when counting a source manually
    pub max_count_pages: u32,

    /// Consecutive failed fetches after which a satellite is dropped
    pub max_failed_fetches: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 4,
            max_count_pages: 50,
            max_failed_fetches: 2,
        }
    }
}

/// The canonical search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CanonicalConfig {
    /// Site root, also used to resolve result links
    pub base_url: String,

    /// Path of the search page
    pub search_path: String,
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gov.uk".to_string(),
            search_path: "/search/all".to_string(),
        }
    }
}
