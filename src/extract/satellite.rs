use crate::extract::{collect_anchors, element_text, normalize_date, Attribution, ResultItem, NOT_AVAILABLE};
use crate::source::SourceDescriptor;
use crate::url::resolve_href;
use crate::GreyLitError;
use scraper::Html;

/// Extracts the result items from one satellite listing page
///
/// Each qualifying anchor in the listing container is one item. Date labels
/// are matched to anchors by position: the Nth label found in the container
/// dates the Nth anchor. Items without a matching or readable label get
/// [`NOT_AVAILABLE`].
///
/// # Errors
///
/// Returns [`GreyLitError::Parse`] if the page has no listing container.
pub fn extract_satellite_page(
    body: &str,
    page_url: &str,
    source: &SourceDescriptor,
) -> Result<Vec<ResultItem>, GreyLitError> {
    let document = Html::parse_document(body);
    let container = document
        .select(source.listing.selector())
        .next()
        .ok_or_else(|| GreyLitError::Parse {
            url: page_url.to_string(),
            message: format!("listing container '{}' not found", source.listing),
        })?;

    let dates: Vec<String> = match &source.date {
        Some(spec) => container
            .select(spec.element.selector())
            .map(|label| normalize_date(&element_text(label), spec.layout))
            .collect(),
        None => Vec::new(),
    };

    let items = collect_anchors(container, source)
        .into_iter()
        .enumerate()
        .map(|(position, anchor)| ResultItem {
            title: clean_title(&anchor.text),
            url: resolve_href(&source.base_url, &anchor.href),
            attribution: Attribution::Single(source.title.clone()),
            abstract_text: NOT_AVAILABLE.to_string(),
            last_updated: NOT_AVAILABLE.to_string(),
            date_published: dates
                .get(position)
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        source = %source.name,
        items = items.len(),
        dates = dates.len(),
        "Extracted satellite page {}",
        page_url
    );

    Ok(items)
}

/// Drops line breaks and collapses runs of spaces in anchor text
fn clean_title(text: &str) -> String {
    let without_breaks: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    without_breaks.split_whitespace().collect::<Vec<_>>().join(" ")
}
