use crate::source::SourceDescriptor;
use scraper::ElementRef;

/// A result anchor found inside a listing container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// Raw text content, untrimmed
    pub text: String,
}

/// Returns the element's text content with surrounding whitespace trimmed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects the qualifying result anchors within a listing container
///
/// Anchors are returned in document order. Anchors without an href, pure
/// fragment anchors and anchors under the source's exclusion prefix are
/// skipped.
pub fn collect_anchors(container: ElementRef<'_>, source: &SourceDescriptor) -> Vec<Anchor> {
    container
        .select(source.item.selector())
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            source.qualifies(href).then(|| Anchor {
                href: href.trim().to_string(),
                text: element.text().collect(),
            })
        })
        .collect()
}
