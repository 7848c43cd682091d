use crate::pagination::PaginationError;
use serde::Deserialize;

/// Number of characters at the end of a URL searched for a trailing page number
const TRAILING_WINDOW: usize = 10;

/// How a source addresses its successive listing pages
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "scheme", rename_all = "kebab-case", deny_unknown_fields)]
pub enum PaginationScheme {
    /// Bump the number that immediately follows `marker`
    MarkerIncrement { marker: String, delta: i64 },

    /// Bump the number the URL ends with
    TrailingDigits { delta: i64 },
}

impl PaginationScheme {
    /// Step size between pages
    pub fn delta(&self) -> i64 {
        match self {
            Self::MarkerIncrement { delta, .. } | Self::TrailingDigits { delta } => *delta,
        }
    }

    /// Computes the URL of the page after `url`
    ///
    /// # Example
    ///
    /// ```
    /// use greylit::pagination::PaginationScheme;
    ///
    /// let scheme = PaginationScheme::MarkerIncrement { marker: "page/".into(), delta: 1 };
    /// assert_eq!(
    ///     scheme.advance("https://blog.example.org/page/3/index").unwrap(),
    ///     "https://blog.example.org/page/4/index"
    /// );
    /// ```
    pub fn advance(&self, url: &str) -> Result<String, PaginationError> {
        match self {
            Self::MarkerIncrement { marker, delta } => advance_marker(url, marker, *delta),
            Self::TrailingDigits { delta } => advance_trailing(url, *delta),
        }
    }
}

/// Increments the numeric run that directly follows the first `marker` in `url`
///
/// Everything before the marker and after the digits is kept untouched, so
/// this serves `offset=N`, `page=N` and `page/N/` URLs alike.
pub fn advance_marker(url: &str, marker: &str, delta: i64) -> Result<String, PaginationError> {
    let start = url
        .find(marker)
        .ok_or_else(|| PaginationError::MarkerNotFound {
            url: url.to_string(),
            marker: marker.to_string(),
        })?
        + marker.len();

    let tail = &url[start..];
    let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(PaginationError::NoNumericField {
            url: url.to_string(),
            marker: marker.to_string(),
        });
    }

    let next = step(url, &tail[..digits], delta)?;
    Ok(format!("{}{}{}", &url[..start], next, &tail[digits..]))
}

/// Increments the page number at the very end of `url`
///
/// Only the last ten characters are searched; the longest all-digit suffix
/// within that window is the current page.
pub fn advance_trailing(url: &str, delta: i64) -> Result<String, PaginationError> {
    let digits = url
        .bytes()
        .rev()
        .take(TRAILING_WINDOW)
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return Err(PaginationError::NoTrailingDigits {
            url: url.to_string(),
        });
    }

    let split = url.len() - digits;
    let next = step(url, &url[split..], delta)?;
    Ok(format!("{}{}", &url[..split], next))
}

fn step(url: &str, digits: &str, delta: i64) -> Result<i64, PaginationError> {
    digits
        .parse::<i64>()
        .ok()
        .and_then(|current| current.checked_add(delta))
        .filter(|next| *next >= 0)
        .ok_or_else(|| PaginationError::OutOfRange {
            url: url.to_string(),
        })
}
