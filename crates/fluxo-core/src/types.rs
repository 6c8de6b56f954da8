//! # Domain Types
//!
//! Core domain types shared by the ledger, contact and report screens.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ FinancialRecord │   │  ContactRecord  │   │   BankAccount   │       │
//! │  │  (lançamento)   │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  date           │   │  name           │   │  name, bank     │       │
//! │  │  kind (EntryK.) │   │  document       │   │  balance_cents  │       │
//! │  │  category       │   │  kind (label)   │   └─────────────────┘       │
//! │  │  amount_cents   │   │  status         │                              │
//! │  │  recurring      │   └─────────────────┘   ┌─────────────────┐       │
//! │  └─────────────────┘                         │   Percentage    │       │
//! │                                              │  bps (u32)      │       │
//! │                                              │  2000 = 20 %    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Records are owned by the persistence collaborator. This crate only reads,
//! filters and validates them; `owner_id` is stamped by the app layer from
//! the current session before a record is submitted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::document::parse_digits;
use crate::error::ValidationError;
use crate::filter::Filterable;
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A rate represented in basis points (bps).
///
/// 1 basis point = 0.01 %, so 2000 bps = 20 %. Margins, variable-cost ratios
/// and net margins all use this type to keep arithmetic in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// One hundred percent.
    pub const FULL: Percentage = Percentage(10_000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a rate from a user-entered percentage (20.0 = 20 %).
    ///
    /// Negative, NaN and infinite inputs become 0 %.
    ///
    /// ```rust
    /// use fluxo_core::types::Percentage;
    ///
    /// assert_eq!(Percentage::from_percent(8.25).bps(), 825);
    /// assert_eq!(Percentage::from_percent(-3.0).bps(), 0);
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Percentage(0);
        }
        let bps = (pct * 100.0).round();
        if bps >= u32::MAX as f64 {
            Percentage(u32::MAX)
        } else {
            Percentage(bps as u32)
        }
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the rate is 100 % or more.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.0 >= Self::FULL.0
    }

    /// Sums two rates, saturating instead of overflowing.
    #[inline]
    pub const fn saturating_add(self, other: Percentage) -> Percentage {
        Percentage(self.0.saturating_add(other.0))
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

/// Displays as `20,00%` (pt-BR decimal comma).
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Lançamento
// =============================================================================

/// Whether a lançamento brings money in or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Receita,
    Despesa,
}

impl EntryKind {
    /// Label as persisted by the backend and shown in the kind filter.
    pub const fn label(&self) -> &'static str {
        match self {
            EntryKind::Receita => "receita",
            EntryKind::Despesa => "despesa",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receita" | "entrada" => Ok(EntryKind::Receita),
            "despesa" | "saida" | "saída" => Ok(EntryKind::Despesa),
            _ => Err(ValidationError::NotAllowed {
                field: "tipo".to_string(),
                allowed: vec!["receita".to_string(), "despesa".to_string()],
            }),
        }
    }
}

/// A single ledger entry (lançamento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: String,

    /// User who owns the record; stamped from the session on submit.
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Competence date (no time of day).
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub kind: EntryKind,

    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Amount in centavos, always positive; `kind` carries the direction.
    pub amount_cents: i64,

    /// Contact (client/supplier) this entry refers to.
    #[serde(default)]
    pub counterparty_id: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub recurring: bool,

    /// Number of monthly occurrences when `recurring` is set.
    #[serde(default)]
    pub recurrence_months: Option<u32>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl FinancialRecord {
    /// Creates a one-off lançamento with a fresh id.
    pub fn new(
        date: NaiveDate,
        kind: EntryKind,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        FinancialRecord {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: None,
            date,
            kind,
            category: category.into(),
            description: None,
            amount_cents: amount.cents(),
            counterparty_id: None,
            notes: None,
            recurring: false,
            recurrence_months: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Amount with the sign of its direction: receitas positive, despesas
    /// negative.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Receita => self.amount(),
            EntryKind::Despesa => -self.amount(),
        }
    }
}

impl Filterable for FinancialRecord {
    fn matches_text(&self, needle: &str) -> bool {
        [
            Some(self.category.as_str()),
            self.description.as_deref(),
            self.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }

    fn document_digits(&self) -> Option<String> {
        None
    }

    fn kind_label(&self) -> &str {
        self.kind.label()
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

// =============================================================================
// Contacts
// =============================================================================

/// Known contact kinds.
///
/// Records keep the persisted label as a plain string because older rows
/// were written with the unaccented "Funcionario"; this enum is the
/// canonical form used when creating new contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ContactKind {
    Cliente,
    Fornecedor,
    #[serde(rename = "Funcionário", alias = "Funcionario")]
    Funcionario,
}

impl ContactKind {
    pub const fn label(&self) -> &'static str {
        match self {
            ContactKind::Cliente => "Cliente",
            ContactKind::Fornecedor => "Fornecedor",
            ContactKind::Funcionario => "Funcionário",
        }
    }

    /// Resolves a persisted label, accepting both spellings of Funcionário.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Cliente" => Some(ContactKind::Cliente),
            "Fornecedor" => Some(ContactKind::Fornecedor),
            "Funcionário" | "Funcionario" => Some(ContactKind::Funcionario),
            _ => None,
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Ativo,
    Inativo,
}

/// A client, supplier or employee registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,

    #[serde(default)]
    pub owner_id: Option<String>,

    pub name: String,

    /// CPF or CNPJ, masked or bare digits.
    #[serde(default)]
    pub document: String,

    /// Persisted kind label ("Cliente", "Fornecedor", "Funcionário").
    pub kind: String,

    #[serde(default)]
    pub status: ContactStatus,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Creates an active contact with a fresh id.
    pub fn new(name: impl Into<String>, document: impl Into<String>, kind: ContactKind) -> Self {
        ContactRecord {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: None,
            name: name.into(),
            document: document.into(),
            kind: kind.label().to_string(),
            status: ContactStatus::Ativo,
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ContactStatus::Ativo
    }
}

impl Filterable for ContactRecord {
    fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn document_digits(&self) -> Option<String> {
        let digits = parse_digits(&self.document);
        (!digits.is_empty()).then_some(digits)
    }

    fn kind_label(&self) -> &str {
        &self.kind
    }

    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }
}

// =============================================================================
// Bank Accounts
// =============================================================================

/// A bank account and its current balance (saldo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bank: Option<String>,
    /// May be negative (overdraft).
    pub balance_cents: i64,
}

impl BankAccount {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_from_percent() {
        assert_eq!(Percentage::from_percent(20.0).bps(), 2000);
        assert_eq!(Percentage::from_percent(8.25).bps(), 825);
        assert_eq!(Percentage::from_percent(-1.0), Percentage::zero());
        assert_eq!(Percentage::from_percent(f64::NAN), Percentage::zero());
        assert!((Percentage::from_bps(825).percent() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_percentage_display() {
        assert_eq!(Percentage::from_bps(2000).to_string(), "20,00%");
        assert_eq!(Percentage::from_bps(825).to_string(), "8,25%");
    }

    #[test]
    fn test_entry_kind_parsing() {
        assert_eq!("receita".parse::<EntryKind>().unwrap(), EntryKind::Receita);
        assert_eq!("Despesa".parse::<EntryKind>().unwrap(), EntryKind::Despesa);
        assert!("transfer".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_signed_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let income = FinancialRecord::new(date, EntryKind::Receita, "Vendas", Money::from_cents(500));
        let expense = FinancialRecord::new(date, EntryKind::Despesa, "Aluguel", Money::from_cents(300));
        assert_eq!(income.signed_amount().cents(), 500);
        assert_eq!(expense.signed_amount().cents(), -300);
    }

    #[test]
    fn test_contact_kind_labels() {
        assert_eq!(ContactKind::from_label("Funcionario"), Some(ContactKind::Funcionario));
        assert_eq!(ContactKind::from_label("Funcionário"), Some(ContactKind::Funcionario));
        assert_eq!(ContactKind::from_label("Parceiro"), None);

        let json = serde_json::to_string(&ContactKind::Funcionario).unwrap();
        assert_eq!(json, "\"Funcionário\"");
        let legacy: ContactKind = serde_json::from_str("\"Funcionario\"").unwrap();
        assert_eq!(legacy, ContactKind::Funcionario);
    }

    #[test]
    fn test_record_deserializes_from_camel_case() {
        let json = r#"{
            "id": "l-1",
            "date": "2024-05-10",
            "kind": "despesa",
            "category": "Aluguel",
            "amountCents": 150000,
            "createdAt": "2024-05-10T12:00:00Z"
        }"#;
        let record: FinancialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, EntryKind::Despesa);
        assert_eq!(record.amount().cents(), 150_000);
        assert!(!record.recurring);
        assert!(record.owner_id.is_none());
    }
}
