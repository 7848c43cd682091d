//! The round-based fetch loop
//!
//! Each round fetches one canonical page and one page from every active
//! satellite, all concurrently. A round's items are buffered and merged only
//! once the whole round is in: canonical items first, then satellites in
//! request order. That keeps "first N" truncation independent of which
//! response arrived first.

use crate::engine::{Aggregator, CountEstimate, ResultSet};
use crate::extract::{extract_satellite_page, DetailInfo, ResultItem};
use crate::pagination::PaginationCursor;
use crate::query::AggregationRequest;
use crate::url::with_page;
use crate::GreyLitError;
use futures::future::join_all;
use futures::stream::{self, StreamExt};

/// Collected results of one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub items: Vec<ResultItem>,
    pub rounds: u32,

    /// False if every source ran dry first
    pub reached_target: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fetching,
    Checking,
    Done,
}

/// Paging state for the canonical search
#[derive(Debug)]
struct CanonicalCursor {
    page: u32,
    fetched: u64,
    declared: u64,
    exhausted: bool,
}

/// What one satellite contributed to a round
#[derive(Debug)]
enum SatellitePage {
    /// Already exhausted, not fetched
    Skipped,
    Failed,
    Fetched(Vec<ResultItem>),
}

#[derive(Debug)]
struct Round {
    canonical: Option<Vec<ResultItem>>,
    satellites: Vec<SatellitePage>,
}

impl Aggregator {
    /// Fetches rounds until `max_results` distinct items are collected or
    /// every source is exhausted
    ///
    /// Only the satellites left in `estimate` are paged. The first round
    /// reuses the canonical page read while counting.
    #[tracing::instrument(skip_all, fields(max_results = request.max_results()))]
    pub async fn collect(
        &self,
        request: &AggregationRequest,
        estimate: &CountEstimate,
    ) -> Result<Aggregation, GreyLitError> {
        let max_results = request.max_results();
        let mut accumulated = ResultSet::new();
        let mut canonical = CanonicalCursor {
            page: 1,
            fetched: 0,
            declared: estimate.canonical_total,
            exhausted: false,
        };
        let mut first_page = Some(estimate.first_page.as_str());
        let mut cursors: Vec<PaginationCursor> = estimate
            .sources
            .iter()
            .map(|s| PaginationCursor::new(s.descriptor.clone(), s.search_url.clone()))
            .collect();

        let mut rounds = 0u32;
        let mut reached_target = false;
        let mut phase = Phase::Fetching;

        while phase != Phase::Done {
            phase = match phase {
                Phase::Fetching => {
                    rounds += 1;
                    let round = self
                        .fetch_round(request, &canonical, first_page.take(), &cursors)
                        .await?;
                    self.merge_round(round, &mut accumulated, &mut canonical, &mut cursors);
                    Phase::Checking
                }
                Phase::Checking => {
                    if accumulated.len() >= max_results {
                        accumulated.truncate(max_results);
                        reached_target = true;
                        Phase::Done
                    } else if canonical.exhausted && cursors.iter().all(|c| c.is_exhausted()) {
                        tracing::warn!(
                            "All sources exhausted with {} of {} results",
                            accumulated.len(),
                            max_results
                        );
                        Phase::Done
                    } else {
                        if !canonical.exhausted {
                            canonical.page += 1;
                        }
                        Phase::Fetching
                    }
                }
                Phase::Done => Phase::Done,
            };
        }

        tracing::info!(rounds, "Collected {} results", accumulated.len());

        Ok(Aggregation {
            items: accumulated.into_items(),
            rounds,
            reached_target,
        })
    }

    async fn fetch_round(
        &self,
        request: &AggregationRequest,
        canonical: &CanonicalCursor,
        prefetched: Option<&str>,
        cursors: &[PaginationCursor],
    ) -> Result<Round, GreyLitError> {
        let satellites = join_all(cursors.iter().map(|cursor| async move {
            if cursor.is_exhausted() {
                SatellitePage::Skipped
            } else {
                self.fetch_satellite_page(cursor).await
            }
        }));

        let (canonical, satellites) =
            futures::join!(self.fetch_canonical_round(request, canonical, prefetched), satellites);

        Ok(Round {
            canonical: canonical?,
            satellites,
        })
    }

    async fn fetch_canonical_round(
        &self,
        request: &AggregationRequest,
        canonical: &CanonicalCursor,
        prefetched: Option<&str>,
    ) -> Result<Option<Vec<ResultItem>>, GreyLitError> {
        if canonical.exhausted {
            return Ok(None);
        }
        let url = with_page(request.canonical_url(), canonical.page)?;
        let items = match prefetched {
            Some(body) => self.canonical_items(body, &url).await?,
            None => {
                let body = self.fetcher.fetch(&url).await?;
                self.canonical_items(&body, &url).await?
            }
        };
        Ok(Some(items))
    }

    /// Reads one canonical results page and fetches the detail page of
    /// every entry
    ///
    /// Detail pages are fetched through a bounded worker pool; items keep
    /// their listing order.
    #[tracing::instrument(skip(self, body))]
    async fn canonical_items(&self, body: &str, url: &str) -> Result<Vec<ResultItem>, GreyLitError> {
        let entries = self.layout.parse_listing(body, url, &self.canonical_base)?;

        let workers = self.settings.max_concurrent_requests.max(1) as usize;
        let details: Vec<Option<DetailInfo>> = stream::iter(entries.iter())
            .map(|entry| self.fetch_detail(&entry.url))
            .buffered(workers)
            .collect()
            .await;

        tracing::debug!(items = entries.len(), "Fetched canonical page");

        Ok(entries
            .into_iter()
            .zip(details)
            .map(|(entry, detail)| self.layout.finish_entry(entry, detail, &self.directory))
            .collect())
    }

    async fn fetch_detail(&self, url: &str) -> Option<DetailInfo> {
        match self.fetcher.fetch(url).await {
            Ok(body) => Some(self.layout.parse_detail(&body, &self.directory)),
            Err(e) => {
                tracing::warn!("Detail page unavailable: {}", e);
                None
            }
        }
    }

    async fn fetch_satellite_page(&self, cursor: &PaginationCursor) -> SatellitePage {
        let url = cursor.current_url();
        let source = cursor.source();

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(source = %source.name, "Satellite fetch failed: {}", e);
                return SatellitePage::Failed;
            }
        };

        match extract_satellite_page(&body, url, source) {
            Ok(items) => SatellitePage::Fetched(items),
            Err(e) => {
                tracing::warn!(source = %source.name, "Satellite page unreadable: {}", e);
                SatellitePage::Failed
            }
        }
    }

    /// Appends a finished round and updates every source's exhaustion state
    fn merge_round(
        &self,
        round: Round,
        accumulated: &mut ResultSet,
        canonical: &mut CanonicalCursor,
        cursors: &mut [PaginationCursor],
    ) {
        if let Some(items) = round.canonical {
            canonical.fetched += items.len() as u64;
            let added = accumulated.extend(items);
            tracing::debug!(page = canonical.page, added, "Merged canonical page");

            if added == 0 || canonical.fetched >= canonical.declared {
                tracing::info!("Canonical search exhausted after page {}", canonical.page);
                canonical.exhausted = true;
            }
        }

        for (cursor, page) in cursors.iter_mut().zip(round.satellites) {
            match page {
                SatellitePage::Skipped => continue,
                SatellitePage::Fetched(items) => {
                    cursor.record_success();
                    let added = accumulated.extend(items);
                    tracing::debug!(source = %cursor.source().name, added, "Merged satellite page");
                    if added == 0 {
                        tracing::info!(source = %cursor.source().name, "Source exhausted");
                        cursor.mark_exhausted();
                        continue;
                    }
                }
                SatellitePage::Failed => {
                    let failures = cursor.record_failure();
                    if failures >= self.settings.max_failed_fetches {
                        tracing::warn!(
                            source = %cursor.source().name,
                            "Dropping source after {} failed fetches",
                            failures
                        );
                        cursor.mark_exhausted();
                        continue;
                    }
                }
            }

            if let Err(e) = cursor.advance() {
                tracing::warn!(source = %cursor.source().name, "Source exhausted: {}", e);
            }
        }
    }
}
