//! Output module for presenting search results
//!
//! This module handles:
//! - Printing the numbered result list to the terminal
//! - Writing a markdown report of a search to disk

mod markdown;
mod text;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use text::{print_results, write_results};

use crate::engine::SearchReport;
use crate::query::SortOrder;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a written report says about one search
#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub keywords: String,
    pub sort: SortOrder,

    /// Number of results asked for
    pub requested: usize,

    /// RFC 3339 timestamp of when the search finished
    pub generated_at: String,

    /// Hash of the configuration file the search ran with
    pub config_hash: String,

    pub report: SearchReport,
}

impl SearchSummary {
    /// Summarises a finished search, stamped with the current time
    pub fn new(
        keywords: impl Into<String>,
        sort: SortOrder,
        requested: usize,
        config_hash: impl Into<String>,
        report: SearchReport,
    ) -> Self {
        Self {
            keywords: keywords.into(),
            sort,
            requested,
            generated_at: chrono::Utc::now().to_rfc3339(),
            config_hash: config_hash.into(),
            report,
        }
    }
}
