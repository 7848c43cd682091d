//! Aggregation engine
//!
//! This module contains the search pipeline, including:
//! - Page fetching behind the [`PageFetcher`] seam
//! - Count reconciliation across the canonical and satellite sources
//! - The round-based fetch loop that merges and deduplicates results
//!
//! A search runs count reconciliation once, then the fetch loop over the
//! sources that reported a non-zero count.

mod aggregator;
mod counting;
mod dedup;
mod fetcher;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::Aggregation;
pub use counting::{declared_count, page_anchor_count, CountEstimate, CountOutcome};
pub use dedup::{dedup_preserving_order, ResultSet};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};

use crate::config::{Config, SearchConfig};
use crate::extract::{CanonicalLayout, DepartmentDirectory, ResultItem};
use crate::query::{AggregationRequest, SearchParams};
use crate::GreyLitError;
use std::sync::Arc;

/// Outcome of a complete search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The canonical source reported no results at all
    NoResults,

    Found(SearchReport),
}

/// Results of a search that had something to find
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Results advertised across all sources before fetching
    pub total_estimate: u64,

    /// Deduplicated results, at most the requested number
    pub items: Vec<ResultItem>,

    /// Number of fetch rounds run
    pub rounds: u32,

    /// True when every source ran dry before the requested number was reached
    pub shortfall: bool,
}

/// Runs searches against one canonical site and its satellites
pub struct Aggregator {
    fetcher: Arc<dyn PageFetcher>,
    layout: CanonicalLayout,
    directory: DepartmentDirectory,
    canonical_base: String,
    settings: SearchConfig,
}

impl Aggregator {
    /// Creates an aggregator for the configured canonical site
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &Config) -> Result<Self, GreyLitError> {
        Ok(Self {
            fetcher,
            layout: CanonicalLayout::govuk()?,
            directory: DepartmentDirectory::new(config.departments.clone()),
            canonical_base: config.canonical.base_url.clone(),
            settings: config.search.clone(),
        })
    }

    /// Estimates the available results, then collects up to the requested number
    pub async fn run(&self, request: &AggregationRequest) -> Result<SearchOutcome, GreyLitError> {
        let estimate = match self.reconcile_counts(request).await? {
            CountOutcome::NoResults => return Ok(SearchOutcome::NoResults),
            CountOutcome::Estimate(estimate) => estimate,
        };

        let aggregation = self.collect(request, &estimate).await?;

        Ok(SearchOutcome::Found(SearchReport {
            total_estimate: estimate.total,
            shortfall: !aggregation.reached_target,
            rounds: aggregation.rounds,
            items: aggregation.items,
        }))
    }
}

/// Runs a search with the given fetcher
pub async fn run_search(
    fetcher: Arc<dyn PageFetcher>,
    config: &Config,
    request: &AggregationRequest,
) -> Result<SearchOutcome, GreyLitError> {
    Aggregator::new(fetcher, config)?.run(request).await
}

/// Runs a complete search over HTTP
///
/// This is the main entry point for the binary. It will:
/// 1. Build the request from the configuration and parameters
/// 2. Build the HTTP client
/// 3. Estimate the number of available results
/// 4. Collect and deduplicate results round by round
///
/// # Example
///
/// ```no_run
/// use greylit::config::load_config;
/// use greylit::{search, SearchOutcome, SearchParams, SortOrder};
/// use std::path::Path;
///
/// # async fn example() -> greylit::Result<()> {
/// let config = load_config(Path::new("greylit.toml"))?;
/// let params = SearchParams {
///     keywords: "flood risk".to_string(),
///     departments: Vec::new(),
///     from: None,
///     to: None,
///     sort: SortOrder::Relevance,
///     max_results: 20,
/// };
///
/// if let SearchOutcome::Found(report) = search(&config, &params).await? {
///     println!("{} of ~{} results", report.items.len(), report.total_estimate);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(config: &Config, params: &SearchParams) -> Result<SearchOutcome, GreyLitError> {
    let request = AggregationRequest::from_config(config, params)?;
    let fetcher = HttpFetcher::new(&config.client)?;
    run_search(Arc::new(fetcher), config, &request).await
}
