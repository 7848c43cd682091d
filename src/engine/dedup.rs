use crate::extract::ResultItem;
use std::collections::HashSet;

/// An ordered, duplicate-free collection of results
///
/// Items keep the position of their first occurrence; later equal items are
/// dropped.
#[derive(Debug, Default)]
pub struct ResultSet {
    items: Vec<ResultItem>,
    seen: HashSet<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item, returning false if an equal item is already present
    pub fn push(&mut self, item: ResultItem) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    /// Adds items in order and returns how many were new
    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) -> usize {
        let mut added = 0;
        for item in items {
            if self.push(item) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keeps only the first `len` items
    pub fn truncate(&mut self, len: usize) {
        for dropped in self.items.drain(len.min(self.items.len())..) {
            self.seen.remove(&dropped);
        }
    }

    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }
}

/// Removes duplicates, keeping the first occurrence of each item in place
pub fn dedup_preserving_order(items: impl IntoIterator<Item = ResultItem>) -> Vec<ResultItem> {
    let mut set = ResultSet::new();
    set.extend(items);
    set.into_items()
}
