//! # Ledger Service
//!
//! Lançamento workflows on top of a [`RecordStore`].
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    LedgerService::submit                                │
//! │                                                                         │
//! │  EntryForm (raw strings)                                               │
//! │       │  into_record(): currency::parse, parse_calendar_date           │
//! │       ▼                                                                 │
//! │  validate_record ──✗──► AppError::Core(Validation)                     │
//! │       │                                                                 │
//! │  session.require_user ──✗──► AppError::Unauthenticated                 │
//! │       │  owner_id = user                                                │
//! │       ▼                                                                 │
//! │  expand_recurrence ──► [jan, fev, mar, ...]                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.submit(each)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info, instrument};
use ts_rs::TS;

use fluxo_core::currency::{self, SignPolicy};
use fluxo_core::filter::{self, parse_calendar_date, FilterState};
use fluxo_core::recurrence::expand_recurrence;
use fluxo_core::statement::{consolidated_balance, monthly_results, CashSummary, IncomeStatement, MonthlyResult};
use fluxo_core::validation::validate_record;
use fluxo_core::{BankAccount, EntryKind, FinancialRecord, Money, ValidationError};

use crate::error::AppResult;
use crate::session::Session;
use crate::store::RecordStore;
use crate::view::{RecordView, ViewPage};

// =============================================================================
// Entry Form
// =============================================================================

/// The lançamento form as the front end submits it: every field raw.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,
    /// "receita" or "despesa".
    pub kind: String,
    pub category: String,
    /// Currency text as typed, e.g. "R$ 1.500,00".
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub counterparty_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurrence_months: Option<u32>,
}

impl EntryForm {
    /// Normalises the raw fields into a new record.
    pub fn into_record(self) -> AppResult<FinancialRecord> {
        let date = parse_calendar_date(&self.date).ok_or_else(|| ValidationError::InvalidFormat {
            field: "data".to_string(),
            reason: format!("'{}' is not a date", self.date),
        })?;
        let kind: EntryKind = self.kind.parse()?;

        let amount = currency::parse(&self.amount);
        currency::validate(amount, SignPolicy::Positive)?;

        let mut record = FinancialRecord::new(date, kind, self.category.trim(), amount);
        record.description = non_blank(self.description);
        record.counterparty_id = non_blank(self.counterparty_id);
        record.notes = non_blank(self.notes);
        record.recurring = self.recurring;
        record.recurrence_months = self.recurrence_months;
        Ok(record)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Ledger Service
// =============================================================================

pub struct LedgerService<S> {
    store: S,
    session: Session,
}

impl<S: RecordStore<FinancialRecord>> LedgerService<S> {
    pub fn new(store: S, session: Session) -> Self {
        LedgerService { store, session }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every lançamento, in store order.
    pub async fn load(&self) -> AppResult<Vec<FinancialRecord>> {
        self.store.fetch_records().await
    }

    /// Validates and persists `record`, expanding it when recurring.
    ///
    /// A record whose id is already stored is an edit: it replaces that one
    /// occurrence and is never expanded again. Returns the records actually
    /// stored.
    #[instrument(skip(self, record), fields(category = %record.category, kind = %record.kind))]
    pub async fn submit(&self, mut record: FinancialRecord) -> AppResult<Vec<FinancialRecord>> {
        validate_record(&record)?;
        record.owner_id = Some(self.session.require_user()?);

        let is_edit = self
            .store
            .fetch_records()
            .await?
            .iter()
            .any(|existing| existing.id == record.id);
        let occurrences = if is_edit {
            debug!(id = %record.id, "Replacing stored lançamento");
            vec![record.clone()]
        } else {
            let occurrences = expand_recurrence(&record);
            debug!(occurrences = occurrences.len(), "Expanded lançamento");
            occurrences
        };

        let mut stored = Vec::with_capacity(occurrences.len());
        for occurrence in occurrences {
            stored.push(self.store.submit(occurrence).await?);
        }

        info!(
            count = stored.len(),
            amount = %record.amount(),
            "Lançamento submitted"
        );
        Ok(stored)
    }

    /// Parses the raw form and submits it.
    pub async fn submit_form(&self, form: EntryForm) -> AppResult<Vec<FinancialRecord>> {
        let record = form.into_record()?;
        self.submit(record).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(id).await?;
        info!(id = %id, "Lançamento deleted");
        Ok(())
    }

    /// Renders the current page of the ledger screen.
    pub async fn page(&self, view: &mut RecordView) -> AppResult<ViewPage<FinancialRecord>> {
        let records = self.load().await?;
        Ok(view.render(&records))
    }

    /// DRE for the entries selected by `period`.
    pub async fn income_statement(&self, period: &FilterState) -> AppResult<IncomeStatement> {
        let records = self.load().await?;
        let statement = IncomeStatement::build(&records, period);
        debug!(
            entries = statement.entry_count,
            net = %statement.net_result,
            "Built income statement"
        );
        Ok(statement)
    }

    /// Dashboard cards for the entries selected by `filter`.
    pub async fn cash_summary(&self, filter: &FilterState) -> AppResult<CashSummary> {
        let records = self.load().await?;
        Ok(CashSummary::from_records(filter::apply(&records, filter)))
    }

    pub async fn monthly_results(&self) -> AppResult<Vec<MonthlyResult>> {
        let records = self.load().await?;
        Ok(monthly_results(&records))
    }
}

/// Sum of every stored bank account balance.
pub async fn total_bank_balance<S: RecordStore<BankAccount>>(accounts: &S) -> AppResult<Money> {
    let accounts = accounts.fetch_records().await?;
    Ok(consolidated_balance(&accounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use fluxo_core::CoreError;

    fn service() -> LedgerService<MemoryStore<FinancialRecord>> {
        LedgerService::new(MemoryStore::new(), Session::for_user("user-1"))
    }

    fn form(amount: &str) -> EntryForm {
        EntryForm {
            date: "2024-01-31".to_string(),
            kind: "despesa".to_string(),
            category: " Aluguel ".to_string(),
            amount: amount.to_string(),
            description: Some("  ".to_string()),
            ..EntryForm::default()
        }
    }

    #[test]
    fn test_form_into_record() {
        let record = form("R$ 1.500,00").into_record().unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(record.kind, EntryKind::Despesa);
        assert_eq!(record.category, "Aluguel");
        assert_eq!(record.amount_cents, 150_000);
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_form_rejects_bad_fields() {
        let mut bad_date = form("10,00");
        bad_date.date = "31/01/2024".to_string();
        assert!(bad_date.into_record().is_err());

        let mut bad_kind = form("10,00");
        bad_kind.kind = "transferência".to_string();
        assert!(bad_kind.into_record().is_err());

        let zero = form("R$ 0,00").into_record().unwrap_err();
        assert!(matches!(
            zero,
            AppError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[tokio::test]
    async fn test_submit_stamps_owner() {
        let ledger = service();
        let stored = ledger.submit_form(form("R$ 1.500,00")).await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].owner_id.as_deref(), Some("user-1"));
        assert_eq!(ledger.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_expands_recurrence() {
        let ledger = service();
        let mut recurring = form("1.500,00");
        recurring.recurring = true;
        recurring.recurrence_months = Some(3);

        let stored = ledger.submit_form(recurring).await.unwrap();
        let dates: Vec<_> = stored.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-31", "2024-02-29", "2024-03-31"]);
        assert_eq!(ledger.load().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_resubmit_recurring_occurrence_edits_in_place() {
        let ledger = service();
        let mut recurring = form("1.500,00");
        recurring.recurring = true;
        recurring.recurrence_months = Some(3);
        let stored = ledger.submit_form(recurring).await.unwrap();

        let mut first = stored[0].clone();
        first.notes = Some("reajuste".to_string());
        let edited = ledger.submit(first.clone()).await.unwrap();
        assert_eq!(edited.len(), 1);

        ledger.submit(stored[1].clone()).await.unwrap();

        let all = ledger.load().await.unwrap();
        assert_eq!(all.len(), 3);
        let reloaded = all.iter().find(|r| r.id == first.id).unwrap();
        assert_eq!(reloaded.notes.as_deref(), Some("reajuste"));
    }

    #[tokio::test]
    async fn test_submit_validation_failure_stores_nothing() {
        let ledger = service();
        let record = FinancialRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            EntryKind::Receita,
            "Vendas",
            Money::zero(),
        );

        let err = ledger.submit(record).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(ledger.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_requires_session() {
        let ledger = LedgerService::new(MemoryStore::new(), Session::anonymous());
        let err = ledger.submit_form(form("10,00")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_statement_and_summary() {
        let ledger = service();
        let mut sale = form("R$ 5.000,00");
        sale.kind = "receita".to_string();
        sale.category = "Vendas".to_string();
        ledger.submit_form(sale).await.unwrap();
        ledger.submit_form(form("R$ 1.500,00")).await.unwrap();

        let dre = ledger.income_statement(&FilterState::new()).await.unwrap();
        assert_eq!(dre.net_result, Money::from_cents(350_000));

        let mut only_expenses = FilterState::new();
        only_expenses.set_kind_filter(Some("despesa".to_string()));
        let summary = ledger.cash_summary(&only_expenses).await.unwrap();
        assert_eq!(summary.inflow, Money::zero());
        assert_eq!(summary.outflow, Money::from_cents(150_000));

        let months = ledger.monthly_results().await.unwrap();
        assert_eq!(months.len(), 1);
    }

    #[tokio::test]
    async fn test_page_and_delete() {
        let ledger = service();
        let stored = ledger.submit_form(form("10,00")).await.unwrap();

        let mut view = RecordView::new(10);
        assert_eq!(ledger.page(&mut view).await.unwrap().total_filtered, 1);

        ledger.delete(&stored[0].id).await.unwrap();
        assert_eq!(ledger.page(&mut view).await.unwrap().total_filtered, 0);
    }

    #[tokio::test]
    async fn test_total_bank_balance() {
        let accounts = MemoryStore::with_records(vec![BankAccount {
            id: "1".to_string(),
            name: "Conta corrente".to_string(),
            bank: None,
            balance_cents: 12_345,
        }]);
        assert_eq!(total_bank_balance(&accounts).await.unwrap(), Money::from_cents(12_345));
    }
}
