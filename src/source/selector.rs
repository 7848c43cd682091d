use crate::ConfigError;
use scraper::Selector;
use serde::Deserialize;
use std::fmt;

/// A declarative element selector: a tag name plus optional class list
///
/// This is the whole selector grammar sources may use. Containers, anchors
/// within a container, date labels and count headers are all expressed as a
/// `SelectorSpec`; anchor attributes are always read from `href`.
///
/// The selector is compiled to CSS when it is constructed, so a
/// configuration that loads successfully never fails to select later.
///
/// # Example
///
/// ```
/// use greylit::source::SelectorSpec;
///
/// let spec = SelectorSpec::new("div", Some("finder-results js-finder-results")).unwrap();
/// assert_eq!(spec.css(), "div.finder-results.js-finder-results");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSelectorSpec")]
pub struct SelectorSpec {
    tag: String,
    class: Option<String>,
    compiled: Selector,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSelectorSpec {
    tag: String,
    #[serde(default)]
    class: Option<String>,
}

impl TryFrom<RawSelectorSpec> for SelectorSpec {
    type Error = ConfigError;

    fn try_from(raw: RawSelectorSpec) -> Result<Self, Self::Error> {
        Self::new(&raw.tag, raw.class.as_deref())
    }
}

impl SelectorSpec {
    /// Builds and compiles a selector
    ///
    /// `class` may hold several whitespace-separated class names, all of which
    /// must be present on a matching element.
    pub fn new(tag: &str, class: Option<&str>) -> Result<Self, ConfigError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ConfigError::InvalidSelector(
                "selector tag cannot be empty".to_string(),
            ));
        }

        if tag != "*" && !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::InvalidSelector(format!(
                "selector tag '{}' must be an element name",
                tag
            )));
        }

        let class = class
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let css = render_css(tag, class.as_deref());
        let compiled = Selector::parse(&css)
            .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", css, e)))?;

        Ok(Self {
            tag: tag.to_string(),
            class,
            compiled,
        })
    }

    /// The element name this selector matches
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The raw class list, if any
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The compiled selector
    pub fn selector(&self) -> &Selector {
        &self.compiled
    }

    /// The CSS form of this selector
    pub fn css(&self) -> String {
        render_css(&self.tag, self.class.as_deref())
    }
}

impl PartialEq for SelectorSpec {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.class == other.class
    }
}

impl Eq for SelectorSpec {}

impl fmt::Display for SelectorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

fn render_css(tag: &str, class: Option<&str>) -> String {
    let mut css = tag.to_string();
    for name in class.unwrap_or_default().split_whitespace() {
        css.push('.');
        css.push_str(&escape_ident(name));
    }
    css
}

/// Escapes characters that are not valid in a bare CSS identifier
///
/// Real class names such as `govuk-!-width-one-half` need this.
fn escape_ident(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}
