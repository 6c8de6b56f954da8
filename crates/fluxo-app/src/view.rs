//! # List Views
//!
//! Explicit filter + page state for a list screen (lançamentos, cadastros).
//!
//! ## Render Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    RecordView::render                                   │
//! │                                                                         │
//! │  all records ──► filter::apply(FilterState) ──► paginate(len, size, p) │
//! │                        (order kept)                    │               │
//! │                                                        ▼               │
//! │                                     ViewPage { items, window, total }  │
//! │                                                                         │
//! │  Nothing is cached. Any filter setter resets the page to 1.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use fluxo_core::filter::{self, FilterState, Filterable};
use fluxo_core::pagination::{paginate, PageWindow, DEFAULT_PAGE_SIZE};

/// One rendered page of a list screen.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ViewPage<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
    /// Records left after filtering, across all pages.
    pub total_filtered: usize,
    /// Records before filtering.
    pub total_records: usize,
}

/// Filter and page selection of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    filter: FilterState,
    page: usize,
    page_size: usize,
}

impl Default for RecordView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RecordView {
    pub fn new(page_size: usize) -> Self {
        RecordView {
            filter: FilterState::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    // =========================================================================
    // Filter Setters
    // =========================================================================

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.set_search_term(term);
        self.page = 1;
    }

    pub fn set_kind_filter(&mut self, kind: Option<String>) {
        self.filter.set_kind_filter(kind);
        self.page = 1;
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.filter.set_date_range(start, end);
        self.page = 1;
    }

    /// Replaces the whole filter (restoring a saved screen state).
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.page = 1;
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Requests `page`; it is clamped on the next render.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // =========================================================================
    // Render
    // =========================================================================

    /// Filters and pages `records` for display.
    ///
    /// The requested page is clamped into range and written back, so
    /// `next_page` after rendering the last page stays on it.
    pub fn render<T: Filterable + Clone>(&mut self, records: &[T]) -> ViewPage<T> {
        let filtered = filter::apply(records, &self.filter);
        let window = paginate(filtered.len(), self.page_size, self.page);
        self.page = window.current_page;

        let items = window.slice(&filtered).iter().map(|r| (*r).clone()).collect();

        ViewPage {
            items,
            total_filtered: filtered.len(),
            total_records: records.len(),
            window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxo_core::{EntryKind, FinancialRecord, Money};

    fn ledger(n: usize) -> Vec<FinancialRecord> {
        (0..n)
            .map(|i| {
                let kind = if i % 2 == 0 { EntryKind::Receita } else { EntryKind::Despesa };
                FinancialRecord::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1 + (i % 28) as u32).unwrap(),
                    kind,
                    format!("Categoria {}", i),
                    Money::from_cents(1_000),
                )
            })
            .collect()
    }

    #[test]
    fn test_render_first_page() {
        let records = ledger(23);
        let mut view = RecordView::new(10);
        let page = view.render(&records);

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_filtered, 23);
        assert_eq!(page.window.total_pages, 3);
        assert_eq!(page.items[0].id, records[0].id);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let records = ledger(23);
        let mut view = RecordView::new(10);
        view.set_page(3);
        assert_eq!(view.render(&records).items.len(), 3);

        view.set_kind_filter(Some("despesa".to_string()));
        assert_eq!(view.page(), 1);

        let page = view.render(&records);
        assert_eq!(page.total_filtered, 11);
        assert!(page.items.iter().all(|r| r.kind == EntryKind::Despesa));
    }

    #[test]
    fn test_page_clamped_on_render() {
        let records = ledger(5);
        let mut view = RecordView::new(2);
        view.set_page(99);
        let page = view.render(&records);

        assert_eq!(page.window.current_page, 3);
        assert_eq!(view.page(), 3);
        assert_eq!(page.items.len(), 1);

        view.next_page();
        assert_eq!(view.render(&records).window.current_page, 3);
    }

    #[test]
    fn test_empty_result() {
        let records = ledger(5);
        let mut view = RecordView::default();
        view.set_search_term("inexistente");
        let page = view.render(&records);

        assert!(page.items.is_empty());
        assert_eq!(page.window.total_pages, 1);
        assert_eq!(page.total_records, 5);
        assert!(!page.window.needs_controls());
    }
}
