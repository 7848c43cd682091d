//! Pagination module for stepping through satellite listings
//!
//! A satellite source's next page is always derived from the URL of the page
//! before it, never from page content. Two addressing schemes are supported:
//!
//! - **Marker increment**: a numeric run directly after a fixed marker such as
//!   `page/` or `offset=` is bumped by a delta
//! - **Trailing digits**: the number at the very end of the URL is bumped

mod cursor;
mod scheme;

pub use cursor::PaginationCursor;
pub use scheme::{advance_marker, advance_trailing, PaginationScheme};

use thiserror::Error;

/// Errors raised when a URL cannot be advanced to its next page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("marker '{marker}' not found in {url}")]
    MarkerNotFound { url: String, marker: String },

    #[error("no numeric field after marker '{marker}' in {url}")]
    NoNumericField { url: String, marker: String },

    #[error("no trailing page number in {url}")]
    NoTrailingDigits { url: String },

    #[error("page number out of range in {url}")]
    OutOfRange { url: String },
}
