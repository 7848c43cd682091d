//! Search requests
//!
//! This module turns what a user asked for ([`SearchParams`]) and the loaded
//! [`Config`] into an immutable [`AggregationRequest`]: the canonical search
//! URL plus the satellite sources activated for the chosen organisations.

mod search_url;

pub use search_url::{canonical_search_url, satellite_search_url};

use crate::config::Config;
use crate::extract::Department;
use crate::source::SourceDescriptor;
use crate::GreyLitError;
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Result ordering requested from the canonical search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Relevance,
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    /// Value of the canonical search's `order` parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::NewestFirst => "updated-newest",
            Self::OldestFirst => "updated-oldest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = GreyLitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "newest" | "newest-first" => Ok(Self::NewestFirst),
            "oldest" | "oldest-first" => Ok(Self::OldestFirst),
            other => Err(GreyLitError::InvalidRequest(format!(
                "unknown sort order '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Relevance => "Relevance",
            Self::NewestFirst => "Newest First",
            Self::OldestFirst => "Oldest First",
        })
    }
}

/// What the user asked to search for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub keywords: String,

    /// Organisation titles to search; empty means every configured department
    pub departments: Vec<String>,

    /// Earliest publication date, inclusive
    pub from: Option<NaiveDate>,

    /// Latest publication date, inclusive
    pub to: Option<NaiveDate>,

    pub sort: SortOrder,

    pub max_results: usize,
}

/// A satellite source activated for one request
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteSource {
    pub descriptor: Arc<SourceDescriptor>,

    /// The first search results page for the request's keywords
    pub search_url: String,
}

/// Immutable input to one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    canonical_url: String,
    sources: Vec<SatelliteSource>,
    max_results: usize,
}

impl AggregationRequest {
    /// Creates a request from already-built URLs
    ///
    /// # Errors
    ///
    /// Returns [`GreyLitError::InvalidRequest`] if `max_results` is zero and
    /// [`GreyLitError::UrlParse`] if `canonical_url` is not absolute.
    pub fn new(
        canonical_url: impl Into<String>,
        sources: Vec<SatelliteSource>,
        max_results: usize,
    ) -> Result<Self, GreyLitError> {
        if max_results == 0 {
            return Err(GreyLitError::InvalidRequest(
                "max results must be greater than zero".to_string(),
            ));
        }

        let canonical_url = canonical_url.into();
        ::url::Url::parse(&canonical_url)?;

        Ok(Self {
            canonical_url,
            sources,
            max_results,
        })
    }

    /// Builds the request for `params` against the configured sources
    ///
    /// Satellite sources are activated, in configuration order, when they
    /// belong to one of the selected departments.
    pub fn from_config(config: &Config, params: &SearchParams) -> Result<Self, GreyLitError> {
        if params.keywords.trim().is_empty() {
            return Err(GreyLitError::InvalidRequest(
                "keywords cannot be empty".to_string(),
            ));
        }

        check_dates(params.from, params.to, Local::now().date_naive())?;

        let selected = select_departments(&config.departments, &params.departments)?;
        let canonical_url = canonical_search_url(&config.canonical, &selected, params)?;

        let mut sources: Vec<SatelliteSource> = Vec::new();
        for descriptor in &config.sources {
            if !selected.iter().any(|d| d.title == descriptor.title) {
                continue;
            }

            let activated = SatelliteSource {
                search_url: satellite_search_url(descriptor, &params.keywords)?,
                descriptor: Arc::new(descriptor.clone()),
            };
            if !sources.contains(&activated) {
                sources.push(activated);
            }
        }

        tracing::debug!(
            departments = selected.len(),
            satellites = sources.len(),
            "Built search request for '{}'",
            params.keywords
        );

        Self::new(canonical_url, sources, params.max_results)
    }

    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    pub fn sources(&self) -> &[SatelliteSource] {
        &self.sources
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Publication bounds must be ordered and lie strictly before `today`
fn check_dates(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), GreyLitError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(GreyLitError::InvalidRequest(format!(
                "start date {} is after end date {}",
                from, to
            )));
        }
    }

    for (label, date) in [("start", from), ("end", to)] {
        if let Some(date) = date {
            if date >= today {
                return Err(GreyLitError::InvalidRequest(format!(
                    "{} date {} must be before today ({})",
                    label, date, today
                )));
            }
        }
    }

    Ok(())
}

/// Resolves requested titles to departments
///
/// A selected department brings in every organisation it works with, and
/// theirs in turn. The result keeps configuration order without repeats.
fn select_departments<'a>(
    departments: &'a [Department],
    titles: &[String],
) -> Result<Vec<&'a Department>, GreyLitError> {
    if titles.is_empty() {
        return Ok(departments.iter().collect());
    }

    let mut pending: Vec<&Department> = Vec::new();
    for title in titles {
        let department = departments
            .iter()
            .find(|d| d.title == title.trim())
            .ok_or_else(|| {
                GreyLitError::InvalidRequest(format!("unknown department '{}'", title))
            })?;
        pending.push(department);
    }

    let mut selected: HashSet<&str> = HashSet::new();
    while let Some(department) = pending.pop() {
        if !selected.insert(department.title.as_str()) {
            continue;
        }
        pending.extend(
            departments
                .iter()
                .filter(|d| department.works_with.iter().any(|slug| slug == d.slug())),
        );
    }

    Ok(departments
        .iter()
        .filter(|d| selected.contains(d.title.as_str()))
        .collect())
}
