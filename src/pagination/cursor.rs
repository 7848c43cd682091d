use crate::pagination::PaginationError;
use crate::source::SourceDescriptor;
use std::sync::Arc;

/// Per-source paging state for one aggregation run
///
/// A cursor only moves forward. It has no idea where the last page is; the
/// aggregator decides when a source has run dry and calls
/// [`PaginationCursor::mark_exhausted`].
#[derive(Debug, Clone)]
pub struct PaginationCursor {
    current_url: String,
    source: Arc<SourceDescriptor>,
    exhausted: bool,
    failed_fetches: u32,
}

impl PaginationCursor {
    /// Creates a cursor positioned at the source's first search page
    pub fn new(source: Arc<SourceDescriptor>, start_url: impl Into<String>) -> Self {
        Self {
            current_url: start_url.into(),
            source,
            exhausted: false,
            failed_fetches: 0,
        }
    }

    /// URL of the page to fetch next
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// The descriptor this cursor pages through
    pub fn source(&self) -> &SourceDescriptor {
        &self.source
    }

    /// Returns true once the source should no longer be fetched
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }

    /// Moves to the next page using the source's pagination scheme
    ///
    /// On failure the cursor is marked exhausted and stays on its current URL.
    pub fn advance(&mut self) -> Result<(), PaginationError> {
        match self.source.pagination.advance(&self.current_url) {
            Ok(next) => {
                self.current_url = next;
                Ok(())
            }
            Err(e) => {
                self.exhausted = true;
                Err(e)
            }
        }
    }

    /// Records a failed fetch and returns the consecutive failure count
    pub fn record_failure(&mut self) -> u32 {
        self.failed_fetches += 1;
        self.failed_fetches
    }

    pub fn record_success(&mut self) {
        self.failed_fetches = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationScheme;
    use crate::source::test_descriptor;

    #[test]
    fn test_advance_moves_forward() {
        let source = Arc::new(test_descriptor(
            "https://blog.example.org/",
            PaginationScheme::MarkerIncrement {
                marker: "page/".to_string(),
                delta: 1,
            },
        ));
        let mut cursor = PaginationCursor::new(source, "https://blog.example.org/page/1/?s=x");

        cursor.advance().unwrap();
        cursor.advance().unwrap();

        assert_eq!(cursor.current_url(), "https://blog.example.org/page/3/?s=x");
        assert!(!cursor.is_exhausted());
    }

    #[test]
    fn test_failed_advance_exhausts() {
        let source = Arc::new(test_descriptor(
            "https://blog.example.org/",
            PaginationScheme::TrailingDigits { delta: 1 },
        ));
        let mut cursor = PaginationCursor::new(source, "https://blog.example.org/?s=x");

        assert!(cursor.advance().is_err());
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current_url(), "https://blog.example.org/?s=x");
    }

    #[test]
    fn test_failure_counter_resets() {
        let source = Arc::new(test_descriptor(
            "https://blog.example.org/",
            PaginationScheme::TrailingDigits { delta: 1 },
        ));
        let mut cursor = PaginationCursor::new(source, "https://blog.example.org/?paged=1");

        assert_eq!(cursor.record_failure(), 1);
        assert_eq!(cursor.record_failure(), 2);
        cursor.record_success();
        assert_eq!(cursor.record_failure(), 1);
    }
}
