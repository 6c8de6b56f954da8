//! # Record Filter
//!
//! Compound filtering shared by the lançamentos, contacts and DRE screens.
//!
//! ## Predicate Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records ──► text match ──► kind match ──► date range ──► filtered     │
//! │              (name/doc)     (alias-aware)  (inclusive)                 │
//! │                                                                         │
//! │  • AND of all three predicates                                         │
//! │  • Stable: relative order of the input is preserved                    │
//! │  • Empty FilterState returns every record                              │
//! │  • Recomputed from scratch on every call (collections are small)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::document::parse_digits;

/// Kind filter value that means "no kind restriction".
pub const ALL_KINDS: &str = "todos";

// =============================================================================
// Filterable
// =============================================================================

/// What a record exposes to [`apply`].
pub trait Filterable {
    /// Whether any of the record's searchable text fields contains `needle`.
    ///
    /// `needle` is already trimmed and lower-cased.
    fn matches_text(&self, needle: &str) -> bool;

    /// The record's CPF/CNPJ as bare digits, if it has one.
    fn document_digits(&self) -> Option<String>;

    /// Persisted kind label ("receita", "Cliente", "Funcionário", ...).
    fn kind_label(&self) -> &str;

    /// Calendar date used by the date-range predicate.
    fn record_date(&self) -> Option<NaiveDate>;
}

// =============================================================================
// FilterState
// =============================================================================

/// The filter inputs of a list screen.
///
/// Owned by the presenting view and changed only through the setters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    search_term: String,
    kind_filter: Option<String>,
    #[ts(as = "Option<String>")]
    start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    end_date: Option<NaiveDate>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Sets the kind filter. Empty strings and `"todos"` clear it.
    pub fn set_kind_filter(&mut self, kind: Option<String>) {
        self.kind_filter = kind.filter(|k| {
            let k = k.trim();
            !k.is_empty() && !k.eq_ignore_ascii_case(ALL_KINDS)
        });
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.end_date = date;
    }

    /// Sets both bounds at once.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start_date = start;
        self.end_date = end;
    }

    /// Resets every field (the "Limpar filtros" button).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn kind_filter(&self) -> Option<&str> {
        self.kind_filter.as_deref()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// True when applying this state is the identity transform.
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.kind_filter.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Filters `records`, keeping their original order.
///
/// ```rust
/// use fluxo_core::filter::{apply, FilterState};
/// use fluxo_core::types::{ContactKind, ContactRecord};
///
/// let contacts = vec![
///     ContactRecord::new("Ana Souza", "123.456.789-01", ContactKind::Cliente),
///     ContactRecord::new("Bruno Lima", "98765432100", ContactKind::Fornecedor),
/// ];
///
/// let mut filter = FilterState::new();
/// filter.set_search_term("4567");
/// let found = apply(&contacts, &filter);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Ana Souza");
/// ```
pub fn apply<'a, T: Filterable>(records: &'a [T], filter: &FilterState) -> Vec<&'a T> {
    if filter.is_empty() {
        return records.iter().collect();
    }

    let needle = filter.search_term.trim().to_lowercase();
    let needle_digits = parse_digits(&needle);

    records
        .iter()
        .filter(|record| matches_search(*record, &needle, &needle_digits))
        .filter(|record| matches_kind(record.kind_label(), filter.kind_filter()))
        .filter(|record| matches_date(record.record_date(), filter.start_date, filter.end_date))
        .collect()
}

/// Like [`apply`] but returns owned copies.
pub fn apply_owned<T: Filterable + Clone>(records: &[T], filter: &FilterState) -> Vec<T> {
    apply(records, filter).into_iter().cloned().collect()
}

fn matches_search<T: Filterable>(record: &T, needle: &str, needle_digits: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if record.matches_text(needle) {
        return true;
    }
    if needle_digits.is_empty() {
        return false;
    }
    record
        .document_digits()
        .is_some_and(|doc| doc.contains(needle_digits))
}

/// Exact match, except that the accented and unaccented spellings of
/// Funcionário are interchangeable.
pub fn matches_kind(label: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) => {
            let wanted = wanted.trim();
            let label = label.trim();
            wanted == label || (is_employee_label(wanted) && is_employee_label(label))
        }
    }
}

fn is_employee_label(label: &str) -> bool {
    matches!(label, "Funcionário" | "Funcionario")
}

/// Inclusive on both bounds; one-sided when only one is given.
pub fn matches_date(date: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

/// Parses a date filter input as a calendar date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; the time of day is
/// dropped (the date as written, not converted to any timezone).
///
/// ```rust
/// use fluxo_core::filter::parse_calendar_date;
///
/// let d = parse_calendar_date("2024-03-31T23:59:00-03:00").unwrap();
/// assert_eq!(d.to_string(), "2024-03-31");
/// assert!(parse_calendar_date("31/03/2024").is_none());
/// ```
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{ContactKind, ContactRecord, EntryKind, FinancialRecord};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contact(name: &str, document: &str, kind: &str, created: NaiveDate) -> ContactRecord {
        let mut c = ContactRecord::new(name, document, ContactKind::Cliente);
        c.kind = kind.to_string();
        c.created_at = Utc.from_utc_datetime(&created.and_hms_opt(15, 30, 0).unwrap());
        c
    }

    fn sample_contacts() -> Vec<ContactRecord> {
        vec![
            contact("Ana Souza", "123.456.789-01", "Cliente", date(2024, 1, 10)),
            contact("Bruno Lima", "12.345.678/0001-99", "Fornecedor", date(2024, 2, 5)),
            contact("Carla Dias", "", "Funcionário", date(2024, 3, 1)),
            contact("Diego Alves", "98765432100", "Funcionario", date(2024, 3, 20)),
        ]
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let contacts = sample_contacts();
        let result = apply(&contacts, &FilterState::default());
        assert_eq!(result.len(), contacts.len());
        for (a, b) in result.iter().zip(contacts.iter()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let contacts = sample_contacts();
        let mut filter = FilterState::new();
        filter.set_search_term("  sOUZA ");
        let result = apply(&contacts, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Ana Souza");
    }

    #[test]
    fn test_text_search_matches_document_digits() {
        let contacts = sample_contacts();
        let mut filter = FilterState::new();
        filter.set_search_term("/0001-99");
        let names: Vec<_> = apply(&contacts, &filter).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Lima"]);
    }

    #[test]
    fn test_kind_filter_employee_alias() {
        let contacts = sample_contacts();
        let mut filter = FilterState::new();
        filter.set_kind_filter(Some("Funcionário".to_string()));
        let names: Vec<_> = apply(&contacts, &filter).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Carla Dias", "Diego Alves"]);

        filter.set_kind_filter(Some("Funcionario".to_string()));
        assert_eq!(apply(&contacts, &filter).len(), 2);
    }

    #[test]
    fn test_kind_filter_exact_otherwise() {
        assert!(matches_kind("Cliente", Some("Cliente")));
        assert!(!matches_kind("Cliente", Some("cliente")));
        assert!(!matches_kind("Fornecedor", Some("Cliente")));
        assert!(matches_kind("Fornecedor", None));
    }

    #[test]
    fn test_kind_filter_todos_clears() {
        let mut filter = FilterState::new();
        filter.set_kind_filter(Some("Todos".to_string()));
        assert!(filter.kind_filter().is_none());
        filter.set_kind_filter(Some("  ".to_string()));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let contacts = sample_contacts();
        let mut filter = FilterState::new();
        filter.set_date_range(Some(date(2024, 2, 5)), Some(date(2024, 3, 1)));
        let names: Vec<_> = apply(&contacts, &filter).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Lima", "Carla Dias"]);
    }

    #[test]
    fn test_date_range_one_sided() {
        let contacts = sample_contacts();
        let mut filter = FilterState::new();
        filter.set_start_date(Some(date(2024, 3, 1)));
        assert_eq!(apply(&contacts, &filter).len(), 2);

        filter.clear();
        filter.set_end_date(Some(date(2024, 1, 10)));
        assert_eq!(apply(&contacts, &filter).len(), 1);
    }

    #[test]
    fn test_missing_date_fails_bounded_test() {
        assert!(matches_date(None, None, None));
        assert!(!matches_date(None, Some(date(2024, 1, 1)), None));
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = vec![
            FinancialRecord::new(date(2024, 1, 5), EntryKind::Receita, "Vendas", Money::from_cents(100)),
            FinancialRecord::new(date(2024, 1, 6), EntryKind::Despesa, "Vendas online", Money::from_cents(50)),
            FinancialRecord::new(date(2024, 2, 1), EntryKind::Receita, "Vendas", Money::from_cents(70)),
        ];
        let mut filter = FilterState::new();
        filter.set_search_term("vendas");
        filter.set_kind_filter(Some("receita".to_string()));
        filter.set_end_date(Some(date(2024, 1, 31)));

        let result = apply(&records, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount_cents, 100);

        let owned = apply_owned(&records, &filter);
        assert_eq!(owned[0].id, records[0].id);
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date("2024-01-01T00:30:00Z"), Some(date(2024, 1, 1)));
        assert_eq!(parse_calendar_date(""), None);
    }
}
