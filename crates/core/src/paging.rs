//! Paging parameters for listing and search operations
//!
//! Every bulk operation takes a [`Page`] expressed as (start, take).
//! `(0, 0)` means "all records". Retrieval cost is bounded by paging, not
//! by cancellation.

use serde::{Deserialize, Serialize};

/// Page window over a result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based index of the first record to return
    pub start: usize,
    /// Number of records to return; 0 means "no limit"
    pub take: usize,
}

impl Page {
    /// The whole result list
    pub const ALL: Page = Page { start: 0, take: 0 };

    /// Create a page window
    pub const fn new(start: usize, take: usize) -> Self {
        Page { start, take }
    }

    /// Whether this window selects everything
    pub const fn is_all(&self) -> bool {
        self.start == 0 && self.take == 0
    }

    /// Apply the window to a collected result list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let mut iter = items.into_iter().skip(self.start);
        if self.take == 0 {
            iter.collect()
        } else {
            iter.by_ref().take(self.take).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selects_everything() {
        assert!(Page::ALL.is_all());
        assert_eq!(Page::ALL.apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_skip_and_take() {
        let page = Page::new(1, 2);
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[test]
    fn test_take_zero_means_unlimited() {
        let page = Page::new(2, 0);
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![3, 4]);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let page = Page::new(10, 5);
        assert_eq!(page.apply(vec![1, 2, 3]), Vec::<i32>::new());
    }
}
