//! # Recurrence
//!
//! Expands a recurring lançamento into one entry per month.
//!
//! ```text
//! Aluguel R$ 1.500, 31/01, recurring 3 months
//!      │
//!      ▼
//! 31/01 ── 29/02 ── 31/03      (day clamped to the end of short months)
//! ```

use chrono::{Months, NaiveDate};

use crate::types::FinancialRecord;

/// Returns the monthly occurrences of `record`.
///
/// A non-recurring record (or one without a month count) comes back as a
/// single unchanged entry. Otherwise the first occurrence keeps the
/// original id and every later one gets a fresh id.
///
/// ```rust
/// use chrono::NaiveDate;
/// use fluxo_core::money::Money;
/// use fluxo_core::recurrence::expand_recurrence;
/// use fluxo_core::types::{EntryKind, FinancialRecord};
///
/// let mut rent = FinancialRecord::new(
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     EntryKind::Despesa,
///     "Aluguel",
///     Money::from_cents(150_000),
/// );
/// rent.recurring = true;
/// rent.recurrence_months = Some(3);
///
/// let dates: Vec<String> = expand_recurrence(&rent).iter().map(|r| r.date.to_string()).collect();
/// assert_eq!(dates, ["2024-01-31", "2024-02-29", "2024-03-31"]);
/// ```
pub fn expand_recurrence(record: &FinancialRecord) -> Vec<FinancialRecord> {
    let months = match (record.recurring, record.recurrence_months) {
        (true, Some(months)) if months > 1 => months,
        _ => return vec![record.clone()],
    };

    (0..months)
        .filter_map(|offset| {
            let date = occurrence_date(record.date, offset)?;
            let mut occurrence = record.clone();
            occurrence.date = date;
            if offset > 0 {
                occurrence.id = uuid::Uuid::new_v4().to_string();
            }
            Some(occurrence)
        })
        .collect()
}

/// Date of the `offset`-th monthly occurrence, clamped to month end.
///
/// Always counted from the original date so that a 31st does not drift to
/// the 28th after passing through February.
fn occurrence_date(start: NaiveDate, offset: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(offset))
}
