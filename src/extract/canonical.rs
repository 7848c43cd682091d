//! Canonical search page extraction
//!
//! The canonical site has a fixed, known structure, so its selectors live here
//! rather than in configuration.

use crate::extract::{
    element_text, normalize_date, Attribution, DateLayout, DepartmentDirectory, ResultItem,
    NOT_AVAILABLE,
};
use crate::source::SelectorSpec;
use crate::url::resolve_href;
use crate::{ConfigError, GreyLitError};
use scraper::{Html, Selector};

/// Length of the "Updated: " label in front of each item's update date
const UPDATED_PREFIX_LEN: usize = 9;

/// Selectors describing the canonical site's pages
#[derive(Debug, Clone)]
pub struct CanonicalLayout {
    result_count: SelectorSpec,
    results: SelectorSpec,
    item: SelectorSpec,
    link: SelectorSpec,
    description: SelectorSpec,
    metadata: SelectorSpec,
    logos: SelectorSpec,
    /// Tried in order when no logo names a known organisation
    attribution_regions: Vec<(SelectorSpec, SelectorSpec)>,
    first_published: Selector,
}

/// One listing entry before its detail page has been consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub title: String,
    pub url: String,
    pub abstract_text: String,
    pub last_updated: String,
}

/// What an item's own page says about it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailInfo {
    /// Organisation names, empty if none were found
    pub organisations: Vec<String>,
    pub date_published: String,
}

impl CanonicalLayout {
    /// Selectors for GOV.UK search and content pages
    pub fn govuk() -> Result<Self, ConfigError> {
        let logo_name = || SelectorSpec::new("span", Some("gem-c-organisation-logo__name"));
        let govuk_link = || SelectorSpec::new("a", Some("govuk-link"));

        let first_published = Selector::parse(r#"meta[name="govuk:first-published-at"]"#)
            .map_err(|e| ConfigError::InvalidSelector(e.to_string()))?;

        Ok(Self {
            result_count: SelectorSpec::new("div", Some("result-info__header"))?,
            results: SelectorSpec::new("div", Some("finder-results js-finder-results"))?,
            item: SelectorSpec::new("li", Some("gem-c-document-list__item"))?,
            link: govuk_link()?,
            description: SelectorSpec::new("p", Some("gem-c-document-list__item-description"))?,
            metadata: SelectorSpec::new("ul", Some("gem-c-document-list__item-metadata"))?,
            logos: SelectorSpec::new("li", Some("organisation-logos__logo"))?,
            attribution_regions: vec![
                (
                    SelectorSpec::new("dd", Some("gem-c-metadata__definition"))?,
                    govuk_link()?,
                ),
                (
                    SelectorSpec::new("div", Some("organisations-list"))?,
                    govuk_link()?,
                ),
                (
                    SelectorSpec::new(
                        "div",
                        Some("gem-c-organisation-logo brand--executive-office"),
                    )?,
                    logo_name()?,
                ),
                (
                    SelectorSpec::new(
                        "div",
                        Some("govuk-!-width-one-half govuk-!-margin-top-3 responsive-bottom-margin"),
                    )?,
                    logo_name()?,
                ),
                (
                    SelectorSpec::new(
                        "div",
                        Some("gem-c-organisation-logo brand--attorney-generals-office"),
                    )?,
                    logo_name()?,
                ),
            ],
            first_published,
        })
    }

    /// Parses the entries of one canonical search results page
    ///
    /// # Errors
    ///
    /// Returns [`GreyLitError::Parse`] if the page has no results container.
    pub fn parse_listing(
        &self,
        body: &str,
        page_url: &str,
        base_url: &str,
    ) -> Result<Vec<CanonicalEntry>, GreyLitError> {
        let document = Html::parse_document(body);
        let container = document
            .select(self.results.selector())
            .next()
            .ok_or_else(|| GreyLitError::Parse {
                url: page_url.to_string(),
                message: format!("results container '{}' not found", self.results),
            })?;

        let mut entries = Vec::new();
        for item in container.select(self.item.selector()) {
            let Some((title, href)) = item
                .select(self.link.selector())
                .next()
                .and_then(|a| a.value().attr("href").map(|href| (element_text(a), href)))
            else {
                tracing::warn!("Skipping result without a link on {}", page_url);
                continue;
            };

            let abstract_text = item
                .select(self.description.selector())
                .next()
                .map(element_text)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());

            let last_updated = item
                .select(self.metadata.selector())
                .next()
                .map(|meta| element_text(meta).chars().skip(UPDATED_PREFIX_LEN).collect())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());

            entries.push(CanonicalEntry {
                title,
                url: resolve_href(base_url, href),
                abstract_text,
                last_updated,
            });
        }

        Ok(entries)
    }

    /// Reads organisation names and the first-published date from an item page
    pub fn parse_detail(&self, body: &str, directory: &DepartmentDirectory) -> DetailInfo {
        let document = Html::parse_document(body);

        let mut organisations: Vec<String> = document
            .select(self.logos.selector())
            .filter_map(|logo| directory.match_title(&element_text(logo)))
            .collect();

        if organisations.is_empty() {
            organisations = self
                .attribution_regions
                .iter()
                .find_map(|(region, entry)| {
                    let region = document.select(region.selector()).next()?;
                    Some(
                        region
                            .select(entry.selector())
                            .map(element_text)
                            .filter(|name| !name.is_empty())
                            .collect(),
                    )
                })
                .unwrap_or_default();
        }

        let date_published = document
            .select(&self.first_published)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|content| normalize_date(content, DateLayout::IsoDate))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        DetailInfo {
            organisations,
            date_published,
        }
    }

    /// Builds the final item from a listing entry and its detail page
    ///
    /// Without organisation names from the detail page, the item is attributed
    /// to the department whose own page it is, or [`NOT_AVAILABLE`].
    pub fn finish_entry(
        &self,
        entry: CanonicalEntry,
        detail: Option<DetailInfo>,
        directory: &DepartmentDirectory,
    ) -> ResultItem {
        let detail = detail.unwrap_or_else(|| DetailInfo {
            organisations: Vec::new(),
            date_published: NOT_AVAILABLE.to_string(),
        });

        let attribution = if detail.organisations.is_empty() {
            Attribution::Single(
                directory
                    .owner_of(&entry.url)
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
            )
        } else {
            Attribution::Many(detail.organisations)
        };

        ResultItem {
            title: entry.title,
            url: entry.url,
            attribution,
            abstract_text: entry.abstract_text,
            last_updated: entry.last_updated,
            date_published: detail.date_published,
        }
    }
}

/// Reads the canonical site's declared result count
///
/// Returns `None` when the count header is missing or unreadable.
///
/// # Example
///
/// ```
/// use greylit::extract::{read_declared_total, CanonicalLayout};
///
/// let layout = CanonicalLayout::govuk().unwrap();
/// let body = r#"<div class="result-info__header"> 1,234 results </div>"#;
/// assert_eq!(read_declared_total(body, &layout), Some(1234));
/// ```
pub fn read_declared_total(body: &str, layout: &CanonicalLayout) -> Option<u64> {
    let document = Html::parse_document(body);
    let header = document.select(layout.result_count.selector()).next()?;
    let text = element_text(header);
    text.split_whitespace().next()?.replace(',', "").parse().ok()
}
