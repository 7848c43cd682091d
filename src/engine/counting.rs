//! Count reconciliation
//!
//! Before any results are collected, every source is asked how many results
//! it has for the request. The canonical search declares its count in a
//! header; satellites either declare one too or are counted by walking their
//! listing pages. Satellites that come back with nothing are dropped from the
//! fetch loop.

use crate::engine::Aggregator;
use crate::extract::{collect_anchors, element_text, read_declared_total};
use crate::pagination::advance_marker;
use crate::query::{AggregationRequest, SatelliteSource};
use crate::source::{CountingMode, SelectorSpec, SourceDescriptor};
use crate::GreyLitError;
use futures::future::join_all;
use scraper::Html;
use std::collections::HashSet;

/// Marker bumped to reach the next page while counting manually
const COUNT_MARKER: &str = "page/";

/// Result of count reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum CountOutcome {
    /// The canonical search has nothing for this request
    NoResults,

    Estimate(CountEstimate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountEstimate {
    /// Canonical count plus every surviving satellite's count
    pub total: u64,

    pub canonical_total: u64,

    /// Satellites with a non-zero count, in request order
    pub sources: Vec<SatelliteSource>,

    /// Body of canonical page 1, read while counting
    pub first_page: String,
}

impl Aggregator {
    /// Estimates the results available across all sources of a request
    ///
    /// # Errors
    ///
    /// A canonical fetch failure is fatal. Satellite failures only zero that
    /// satellite's count.
    #[tracing::instrument(skip_all, fields(satellites = request.sources().len()))]
    pub async fn reconcile_counts(
        &self,
        request: &AggregationRequest,
    ) -> Result<CountOutcome, GreyLitError> {
        let body = self.fetcher.fetch(request.canonical_url()).await?;
        let canonical_total = match read_declared_total(&body, &self.layout) {
            Some(total) if total > 0 => total,
            _ => {
                tracing::info!("Canonical search reported no results");
                return Ok(CountOutcome::NoResults);
            }
        };

        let counts = join_all(request.sources().iter().map(|s| self.count_source(s))).await;

        let mut total = canonical_total;
        let mut sources = Vec::new();
        for (source, count) in request.sources().iter().zip(counts) {
            if count == 0 {
                tracing::info!(source = %source.descriptor.name, "Pruning source with no results");
                continue;
            }
            tracing::debug!(source = %source.descriptor.name, count, "Counted source");
            total = total.saturating_add(count);
            sources.push(source.clone());
        }

        tracing::info!(
            canonical = canonical_total,
            satellites = sources.len(),
            "Estimated {} results in total",
            total
        );

        Ok(CountOutcome::Estimate(CountEstimate {
            total,
            canonical_total,
            sources,
            first_page: body,
        }))
    }

    async fn count_source(&self, source: &SatelliteSource) -> u64 {
        match &source.descriptor.counting {
            CountingMode::Declared { element, index } => {
                self.count_declared(source, element, *index).await
            }
            CountingMode::Manual => self.count_manual(source).await,
        }
    }

    async fn count_declared(&self, source: &SatelliteSource, element: &SelectorSpec, index: usize) -> u64 {
        let body = match self.fetcher.fetch(&source.search_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(source = %source.descriptor.name, "Count fetch failed: {}", e);
                return 0;
            }
        };

        declared_count(&body, element, index).unwrap_or_else(|| {
            tracing::debug!(
                source = %source.descriptor.name,
                "No readable count in '{}' at word {}",
                element,
                index
            );
            0
        })
    }

    async fn count_manual(&self, source: &SatelliteSource) -> u64 {
        let descriptor = &source.descriptor;
        let mut url = source.search_url.clone();
        let mut total = 0u64;
        let mut pages = 0u32;

        while pages < self.settings.max_count_pages {
            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(source = %descriptor.name, "Counting stopped: {}", e);
                    return total;
                }
            };
            pages += 1;

            let count = page_anchor_count(&body, descriptor);
            if count == 0 {
                return total;
            }
            total += count as u64;

            url = match advance_marker(&url, COUNT_MARKER, 1) {
                Ok(next) => next,
                Err(e) => {
                    tracing::debug!(source = %descriptor.name, "Counting stopped: {}", e);
                    return total;
                }
            };
        }

        tracing::warn!(
            source = %descriptor.name,
            "Counting stopped after {} pages with {} results",
            pages,
            total
        );
        total
    }
}

/// Reads the integer at word `index` of the first `element` on the page
///
/// Thousands separators are ignored. Returns `None` if the element, the word
/// or the number is missing.
///
/// # Example
///
/// ```
/// use greylit::engine::declared_count;
/// use greylit::source::SelectorSpec;
///
/// let heading = SelectorSpec::new("h1", Some("page-title")).unwrap();
/// let body = r#"<h1 class="page-title">Search results: 1,234 posts</h1>"#;
/// assert_eq!(declared_count(body, &heading, 2), Some(1234));
/// ```
pub fn declared_count(body: &str, element: &SelectorSpec, index: usize) -> Option<u64> {
    let document = Html::parse_document(body);
    let text = element_text(document.select(element.selector()).next()?);
    text.split_whitespace().nth(index)?.replace(',', "").parse().ok()
}

/// Number of distinct result links in a source's listing page
///
/// A page without the listing container counts as empty.
pub fn page_anchor_count(body: &str, source: &SourceDescriptor) -> usize {
    let document = Html::parse_document(body);
    let Some(container) = document.select(source.listing.selector()).next() else {
        return 0;
    };

    collect_anchors(container, source)
        .into_iter()
        .map(|anchor| anchor.href)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{canonical_page, satellite_page, test_config, MemoryFetcher};
    use crate::pagination::PaginationScheme;
    use crate::source::test_descriptor;
    use std::sync::Arc;

    const CANONICAL: &str = "http://gov.test/search/all?keywords=water&page=1";

    fn satellite(base: &str, counting: CountingMode) -> SatelliteSource {
        let mut descriptor = test_descriptor(
            base,
            PaginationScheme::MarkerIncrement {
                marker: "page/".to_string(),
                delta: 1,
            },
        );
        descriptor.counting = counting;
        SatelliteSource {
            search_url: format!("{}page/1/?s=water", base),
            descriptor: Arc::new(descriptor),
        }
    }

    fn aggregator(fetcher: MemoryFetcher) -> Aggregator {
        Aggregator::new(Arc::new(fetcher), &test_config("http://gov.test")).unwrap()
    }

    fn heading() -> SelectorSpec {
        SelectorSpec::new("div", Some("results-count")).unwrap()
    }

    #[test]
    fn test_declared_count_strips_separators() {
        let body = r#"<div class="results-count">1,234 results</div>"#;
        assert_eq!(declared_count(body, &heading(), 0), Some(1234));
    }

    #[test]
    fn test_declared_count_failures() {
        let body = r#"<div class="results-count">Nothing found</div>"#;
        assert_eq!(declared_count(body, &heading(), 0), None);
        assert_eq!(declared_count(body, &heading(), 5), None);
        assert_eq!(declared_count("<p>1 result</p>", &heading(), 0), None);
    }

    #[test]
    fn test_page_anchor_count_ignores_repeats_and_navigation() {
        let mut source = test_descriptor("https://blog.test/", PaginationScheme::TrailingDigits { delta: 1 });
        source.exclusion_prefix = Some("https://blog.test/tag/".to_string());
        let body = r##"<main class="site-main">
            <a href="/a">A</a><a href="/a">Read more</a>
            <a href="/b">B</a><a href="#top">Top</a>
            <a href="https://blog.test/tag/water">water</a>
        </main>"##;

        assert_eq!(page_anchor_count(body, &source), 2);
        assert_eq!(page_anchor_count("<p>no listing</p>", &source), 0);
    }

    #[tokio::test]
    async fn test_canonical_zero_is_no_results() {
        let source = satellite("http://blog.test/", CountingMode::Manual);
        let fetcher = MemoryFetcher::new()
            .page(CANONICAL, canonical_page(0, &[]))
            .page(&source.search_url, satellite_page(&[("A", "/a")]));

        let request = AggregationRequest::new(CANONICAL, vec![source], 10).unwrap();
        let outcome = aggregator(fetcher).reconcile_counts(&request).await.unwrap();
        assert_eq!(outcome, CountOutcome::NoResults);
    }

    #[tokio::test]
    async fn test_canonical_without_header_is_no_results() {
        let fetcher = MemoryFetcher::new().page(CANONICAL, "<html><body>Error</body></html>");
        let request = AggregationRequest::new(CANONICAL, Vec::new(), 10).unwrap();
        let outcome = aggregator(fetcher).reconcile_counts(&request).await.unwrap();
        assert_eq!(outcome, CountOutcome::NoResults);
    }

    #[tokio::test]
    async fn test_canonical_fetch_failure_is_fatal() {
        let request = AggregationRequest::new(CANONICAL, Vec::new(), 10).unwrap();
        let result = aggregator(MemoryFetcher::new()).reconcile_counts(&request).await;
        assert!(matches!(result, Err(GreyLitError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_manual_count_sums_until_empty_page() {
        let source = satellite("http://blog.test/", CountingMode::Manual);
        let five: Vec<(String, String)> =
            (1..=5).map(|i| (format!("Post {}", i), format!("/post-{}", i))).collect();
        let five: Vec<(&str, &str)> = five.iter().map(|(t, h)| (t.as_str(), h.as_str())).collect();

        let fetcher = MemoryFetcher::new()
            .page(CANONICAL, canonical_page(7, &[]))
            .page("http://blog.test/page/1/?s=water", satellite_page(&five))
            .page("http://blog.test/page/2/?s=water", satellite_page(&[]));

        let request = AggregationRequest::new(CANONICAL, vec![source.clone()], 10).unwrap();
        let outcome = aggregator(fetcher).reconcile_counts(&request).await.unwrap();

        assert_eq!(
            outcome,
            CountOutcome::Estimate(CountEstimate {
                total: 12,
                canonical_total: 7,
                sources: vec![source],
                first_page: canonical_page(7, &[]),
            })
        );
    }

    #[tokio::test]
    async fn test_zero_count_sources_are_pruned_in_order() {
        let empty = satellite("http://empty.test/", CountingMode::Manual);
        let broken = satellite(
            "http://broken.test/",
            CountingMode::Declared {
                element: heading(),
                index: 0,
            },
        );
        let declared = satellite(
            "http://declared.test/",
            CountingMode::Declared {
                element: heading(),
                index: 0,
            },
        );
        let manual = satellite("http://manual.test/", CountingMode::Manual);

        let fetcher = MemoryFetcher::new()
            .page(CANONICAL, canonical_page(3, &[]))
            .page(&empty.search_url, satellite_page(&[]))
            .broken(&broken.search_url)
            .page(
                &declared.search_url,
                r#"<div class="results-count">40 results</div>"#,
            )
            .page(&manual.search_url, satellite_page(&[("A", "/a"), ("B", "/b")]));

        let request = AggregationRequest::new(
            CANONICAL,
            vec![empty, broken, declared.clone(), manual.clone()],
            10,
        )
        .unwrap();
        let outcome = aggregator(fetcher).reconcile_counts(&request).await.unwrap();

        let CountOutcome::Estimate(estimate) = outcome else {
            panic!("expected an estimate");
        };
        assert_eq!(estimate.total, 45);
        assert_eq!(estimate.sources, vec![declared, manual]);
    }

    #[tokio::test]
    async fn test_manual_count_is_capped() {
        let source = satellite("http://blog.test/", CountingMode::Manual);
        let mut fetcher = MemoryFetcher::new().page(CANONICAL, canonical_page(1, &[]));
        for page in 1..=60 {
            fetcher = fetcher.page(
                &format!("http://blog.test/page/{}/?s=water", page),
                satellite_page(&[("Same", "/same")]),
            );
        }

        let mut config = test_config("http://gov.test");
        config.search.max_count_pages = 3;
        let fetcher = Arc::new(fetcher);
        let aggregator = Aggregator::new(fetcher.clone(), &config).unwrap();

        let request = AggregationRequest::new(CANONICAL, vec![source], 10).unwrap();
        let CountOutcome::Estimate(estimate) = aggregator.reconcile_counts(&request).await.unwrap()
        else {
            panic!("expected an estimate");
        };

        assert_eq!(estimate.total, 4);
        assert_eq!(fetcher.request_count("http://blog.test/page/4/?s=water"), 0);
    }
}
