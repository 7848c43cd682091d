use serde::Deserialize;
use std::collections::HashSet;

/// A known organisation on the canonical site
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Department {
    /// Display title, matched verbatim against attribution text
    pub title: String,

    /// The organisation's own page on the canonical site
    pub link: String,

    /// Slugs of the agencies and public bodies this department works with;
    /// selecting the department selects them too
    #[serde(default, rename = "works-with")]
    pub works_with: Vec<String>,
}

impl Department {
    /// The organisation filter value: the last path segment of its link
    pub fn slug(&self) -> &str {
        self.link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Lookup table of known organisations
#[derive(Debug, Clone, Default)]
pub struct DepartmentDirectory {
    departments: Vec<Department>,
    titles: HashSet<String>,
}

impl DepartmentDirectory {
    pub fn new(departments: Vec<Department>) -> Self {
        let titles = departments.iter().map(|d| d.title.clone()).collect();
        Self {
            departments,
            titles,
        }
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Maps attribution text to a known title
    ///
    /// Logo captions sometimes run two words together ("UKHealth Security
    /// Agency"), so text that does not match verbatim is retried after
    /// splitting it at camel-case boundaries.
    pub fn match_title(&self, text: &str) -> Option<String> {
        if self.contains(text) {
            return Some(text.to_string());
        }

        let split = split_camel_case(text);
        self.contains(&split).then_some(split)
    }

    /// Title of the department whose own page is `url`
    pub fn owner_of(&self, url: &str) -> Option<&str> {
        self.departments
            .iter()
            .find(|d| d.link == url)
            .map(|d| d.title.as_str())
    }
}

/// Inserts a space at every camel-case word boundary
///
/// A boundary is a lowercase letter followed by an uppercase letter, or an
/// uppercase letter followed by an uppercase-then-lowercase pair.
///
/// # Examples
///
/// ```
/// use greylit::extract::split_camel_case;
///
/// assert_eq!(split_camel_case("HM TreasuryCabinet Office"), "HM Treasury Cabinet Office");
/// assert_eq!(split_camel_case("UKHealth Security Agency"), "UK Health Security Agency");
/// ```
pub fn split_camel_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_ascii_lowercase() && c.is_ascii_uppercase();
            let acronym_end = prev.is_ascii_uppercase()
                && c.is_ascii_uppercase()
                && next.is_some_and(|n| n.is_ascii_lowercase());
            if lower_to_upper || acronym_end {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}
