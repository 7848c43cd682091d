//! URL handling module for Greylit
//!
//! This module decides which anchors count as results, resolves result hrefs
//! against a source's base URL, and rewrites the page number of the canonical
//! search URL.

mod resolve;

pub use resolve::{has_scheme, is_fragment_only, is_qualifying_href, resolve_href};

use ::url::Url;

/// Returns `search_url` with its `page` query parameter set to `page`
///
/// Any existing `page` parameter is replaced in place; otherwise one is
/// appended. All other parameters keep their order.
///
/// # Examples
///
/// ```
/// use greylit::url::with_page;
///
/// let next = with_page("https://www.gov.uk/search/all?keywords=water&page=1", 2).unwrap();
/// assert_eq!(next, "https://www.gov.uk/search/all?keywords=water&page=2");
/// ```
pub fn with_page(search_url: &str, page: u32) -> Result<String, ::url::ParseError> {
    let mut url = Url::parse(search_url)?;
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == "page" && !replaced {
                replaced = true;
                (key.into_owned(), page.to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if !replaced {
            query.append_pair("page", &page.to_string());
        }
    }

    Ok(url.to_string())
}
