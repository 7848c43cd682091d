use crate::extract::DateLayout;
use crate::pagination::PaginationScheme;
use crate::source::SelectorSpec;
use crate::url::is_qualifying_href;
use serde::Deserialize;

/// Configuration for one satellite source
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SourceDescriptor {
    /// Unique short name used in logs
    pub name: String,

    /// The organisation this source belongs to; every item is attributed to it
    pub title: String,

    /// Site root, e.g. `https://educationhub.blog.gov.uk/`
    pub base_url: String,

    /// Appended to `base_url` before the query string
    #[serde(default)]
    pub search_path: String,

    /// Query parameter that carries the keywords
    pub search_query_key: String,

    /// Extra query parameter appended to the first search URL
    #[serde(default)]
    pub initial_page: Option<QueryParam>,

    /// Container holding the result anchors
    pub listing: SelectorSpec,

    /// Result anchors, relative to `listing`
    pub item: SelectorSpec,

    /// Publication date labels, relative to `listing`
    #[serde(default)]
    pub date: Option<DateSpec>,

    /// Anchors whose href starts with this prefix are navigation, not results
    #[serde(default)]
    pub exclusion_prefix: Option<String>,

    pub pagination: PaginationScheme,

    pub counting: CountingMode,
}

impl SourceDescriptor {
    /// Returns true if an anchor with this href is a result rather than
    /// in-page or search navigation
    pub fn qualifies(&self, href: &str) -> bool {
        is_qualifying_href(href, self.exclusion_prefix.as_deref())
    }
}

/// A single `key=value` query parameter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// Where a source prints publication dates and how they are written
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateSpec {
    pub element: SelectorSpec,
    #[serde(default)]
    pub layout: DateLayout,
}

/// How a source's total result count is estimated before fetching
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CountingMode {
    /// Read the number at word `index` of the element's text
    Declared {
        element: SelectorSpec,
        #[serde(default)]
        index: usize,
    },

    /// Count qualifying anchors page by page
    Manual,
}

#[cfg(test)]
pub(crate) fn test_descriptor(base_url: &str, pagination: PaginationScheme) -> SourceDescriptor {
    SourceDescriptor {
        name: "test-blog".to_string(),
        title: "Department for Testing".to_string(),
        base_url: base_url.to_string(),
        search_path: String::new(),
        search_query_key: "s".to_string(),
        initial_page: None,
        listing: SelectorSpec::new("main", Some("site-main")).unwrap(),
        item: SelectorSpec::new("a", None).unwrap(),
        date: None,
        exclusion_prefix: None,
        pagination,
        counting: CountingMode::Manual,
    }
}
