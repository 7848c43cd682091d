/// Returns true for pure in-page anchors such as `#main-content`
pub fn is_fragment_only(href: &str) -> bool {
    href.starts_with('#')
}

/// Returns true if an anchor with this href should be treated as a result
///
/// Empty hrefs, fragment-only hrefs, non-web schemes such as `mailto:` and
/// hrefs starting with the optional exclusion prefix are rejected.
pub fn is_qualifying_href(href: &str, exclusion_prefix: Option<&str>) -> bool {
    let href = href.trim();
    if href.is_empty() || is_fragment_only(href) {
        return false;
    }

    if scheme_of(href).is_some() && !has_scheme(href) {
        return false;
    }

    match exclusion_prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => !href.starts_with(prefix),
        None => true,
    }
}

/// Returns true if `href` is an absolute `http:` or `https:` URL
pub fn has_scheme(href: &str) -> bool {
    scheme_of(href).map_or(false, |scheme| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

/// The scheme of `href`, if it starts with one
fn scheme_of(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;

    let mut chars = scheme.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Resolves a result href against a source's base URL
///
/// Absolute hrefs are returned unchanged. Root-relative hrefs are joined to the
/// base with a single slash between them; other relative hrefs are appended
/// to the base as written.
///
/// # Examples
///
/// ```
/// use greylit::url::resolve_href;
///
/// assert_eq!(
///     resolve_href("https://blog.example.org/", "/2024/01/post"),
///     "https://blog.example.org/2024/01/post"
/// );
/// assert_eq!(
///     resolve_href("https://blog.example.org/", "https://other.org/x"),
///     "https://other.org/x"
/// );
/// ```
pub fn resolve_href(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if has_scheme(href) {
        return href.to_string();
    }

    if href.starts_with('/') {
        format!("{}{}", base_url.strip_suffix('/').unwrap_or(base_url), href)
    } else {
        format!("{}{}", base_url, href)
    }
}
