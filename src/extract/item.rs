use std::fmt;

/// Placeholder for fields a source does not provide or that failed to parse
pub const NOT_AVAILABLE: &str = "N/A";

/// The organisation(s) responsible for a result
///
/// Canonical items list every organisation found on their detail page;
/// satellite items name the single organisation that owns the source. The two
/// shapes never compare equal, even when they name the same organisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribution {
    Single(String),
    Many(Vec<String>),
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(name) => f.write_str(name),
            Self::Many(names) => f.write_str(&names.join("; ")),
        }
    }
}

/// A normalized search result
///
/// Two items are the same result only if every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    pub attribution: Attribution,
    pub abstract_text: String,
    pub last_updated: String,
    /// `DD/MM/YYYY` or [`NOT_AVAILABLE`]
    pub date_published: String,
}
