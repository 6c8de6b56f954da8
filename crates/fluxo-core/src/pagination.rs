//! # Paginator
//!
//! Page window computation over a filtered collection.
//!
//! ## Sliding Window
//! ```text
//! total_pages = 20, window = 5
//!
//!   current = 1   →  [1] 2  3  4  5
//!   current = 10  →   8  9 [10] 11 12
//!   current = 20  →  16 17 18 19 [20]
//! ```
//!
//! Pages are 1-based; indices are 0-based with an exclusive end, so
//! `&items[window.start_index..window.end_index]` is the visible slice.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Maximum number of page buttons shown at once.
pub const VISIBLE_PAGE_COUNT: usize = 5;

/// Default rows per page in list screens.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Everything a list screen needs to render its pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// Always at least 1, even for an empty collection.
    pub total_pages: usize,
    /// The requested page clamped to `1..=total_pages`.
    pub current_page: usize,
    pub start_index: usize,
    /// Exclusive.
    pub end_index: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub visible_pages: Vec<usize>,
}

impl PageWindow {
    /// The rows of `items` that belong to this page.
    ///
    /// Out-of-range windows (computed for a longer list) yield an empty or
    /// shortened slice instead of panicking.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start_index.min(items.len());
        let end = self.end_index.clamp(start, items.len());
        &items[start..end]
    }

    /// Pagination controls are hidden when everything fits on one page.
    pub fn needs_controls(&self) -> bool {
        self.total_pages > 1
    }
}

/// Computes the page window.
///
/// A `page_size` of 0 is treated as 1 and `current_page` is clamped, so
/// every input produces a renderable window.
///
/// ```rust
/// use fluxo_core::pagination::paginate;
///
/// let w = paginate(95, 10, 10);
/// assert_eq!(w.total_pages, 10);
/// assert_eq!((w.start_index, w.end_index), (90, 95));
/// assert!(!w.has_next);
/// ```
pub fn paginate(total_items: usize, page_size: usize, current_page: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let total_pages = total_items.div_ceil(page_size).max(1);
    let current_page = current_page.clamp(1, total_pages);

    let start_index = (current_page - 1) * page_size;
    let end_index = (start_index + page_size).min(total_items);

    PageWindow {
        total_pages,
        current_page,
        start_index: start_index.min(total_items),
        end_index,
        has_next: current_page < total_pages,
        has_previous: current_page > 1,
        visible_pages: visible_pages(total_pages, current_page),
    }
}

/// Window of at most [`VISIBLE_PAGE_COUNT`] pages centred on `current_page`,
/// shifted to stay inside `1..=total_pages`.
fn visible_pages(total_pages: usize, current_page: usize) -> Vec<usize> {
    let half = VISIBLE_PAGE_COUNT / 2;
    let mut first = current_page.saturating_sub(half).max(1);
    let last = (first + VISIBLE_PAGE_COUNT - 1).min(total_pages);
    first = last.saturating_sub(VISIBLE_PAGE_COUNT - 1).max(1);
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let w = paginate(0, 10, 1);
        assert_eq!(w.total_pages, 1);
        assert_eq!(w.current_page, 1);
        assert_eq!((w.start_index, w.end_index), (0, 0));
        assert!(!w.has_next);
        assert!(!w.has_previous);
        assert_eq!(w.visible_pages, vec![1]);
        assert!(!w.needs_controls());
    }

    #[test]
    fn test_partial_last_page() {
        let w = paginate(95, 10, 1);
        assert_eq!(w.total_pages, 10);
        assert_eq!((w.start_index, w.end_index), (0, 10));
        assert!(w.has_next);
        assert!(!w.has_previous);

        let last = paginate(95, 10, 10);
        assert_eq!(last.end_index, 95);
        assert!(last.has_previous);
    }

    #[test]
    fn test_current_page_is_clamped() {
        assert_eq!(paginate(30, 10, 0).current_page, 1);
        let w = paginate(30, 10, 99);
        assert_eq!(w.current_page, 3);
        assert_eq!((w.start_index, w.end_index), (20, 30));
    }

    #[test]
    fn test_zero_page_size() {
        let w = paginate(3, 0, 2);
        assert_eq!(w.total_pages, 3);
        assert_eq!((w.start_index, w.end_index), (1, 2));
    }

    #[test]
    fn test_visible_pages_window() {
        assert_eq!(paginate(200, 10, 1).visible_pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(200, 10, 2).visible_pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(200, 10, 10).visible_pages, vec![8, 9, 10, 11, 12]);
        assert_eq!(paginate(200, 10, 19).visible_pages, vec![16, 17, 18, 19, 20]);
        assert_eq!(paginate(200, 10, 20).visible_pages, vec![16, 17, 18, 19, 20]);
        assert_eq!(paginate(30, 10, 2).visible_pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..25).collect();
        let w = paginate(items.len(), 10, 3);
        assert_eq!(w.slice(&items), &[20, 21, 22, 23, 24]);

        // Window computed for a longer list
        let stale = paginate(100, 10, 5);
        assert!(stale.slice(&items).is_empty());
    }
}
