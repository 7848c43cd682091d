use crate::config::CanonicalConfig;
use crate::extract::Department;
use crate::query::SearchParams;
use crate::source::SourceDescriptor;
use url::Url;

/// Builds the first canonical search results URL for a request
///
/// Parameters are written in a fixed order: one `organisations[]` per
/// department, `order`, `keywords`, the optional publication date bounds, and
/// finally `page=1`.
pub fn canonical_search_url(
    canonical: &CanonicalConfig,
    departments: &[&Department],
    params: &SearchParams,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}{}",
        canonical.base_url.trim_end_matches('/'),
        canonical.search_path
    ))?;

    {
        let mut query = url.query_pairs_mut();
        for department in departments {
            query.append_pair("organisations[]", department.slug());
        }
        query.append_pair("order", params.sort.as_query_value());
        query.append_pair("keywords", &normalize_keywords(&params.keywords));
        if let Some(from) = params.from {
            query.append_pair("public_timestamp[from]", &from.format("%d/%m/%Y").to_string());
        }
        if let Some(to) = params.to {
            query.append_pair("public_timestamp[to]", &to.format("%d/%m/%Y").to_string());
        }
        query.append_pair("page", "1");
    }

    Ok(url.to_string())
}

/// Builds a satellite source's first search results URL
///
/// # Example
///
/// ```
/// use greylit::query::satellite_search_url;
/// use greylit::SourceDescriptor;
///
/// let source: SourceDescriptor = toml::from_str(r#"
/// name = "blog"
/// title = "HM Treasury"
/// base-url = "https://hmtreasury.blog.gov.uk/"
/// search-query-key = "s"
/// initial-page = { key = "paged", value = "1" }
/// listing = { tag = "main" }
/// item = { tag = "a" }
/// pagination = { scheme = "trailing-digits", delta = 1 }
/// counting = { mode = "manual" }
/// "#).unwrap();
///
/// assert_eq!(
///     satellite_search_url(&source, "spending review").unwrap(),
///     "https://hmtreasury.blog.gov.uk/?s=spending+review&paged=1"
/// );
/// ```
pub fn satellite_search_url(
    source: &SourceDescriptor,
    keywords: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(&format!("{}{}", source.base_url, source.search_path))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair(&source.search_query_key, &normalize_keywords(keywords));
        if let Some(param) = &source.initial_page {
            query.append_pair(&param.key, &param.value);
        }
    }

    Ok(url.to_string())
}

fn normalize_keywords(keywords: &str) -> String {
    keywords.split_whitespace().collect::<Vec<_>>().join(" ")
}
