//! # Validation Module
//!
//! Submission rules for lançamentos and contacts.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Front end                                                    │
//! │  └── masks, required markers, immediate feedback                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before the record reaches the store)            │
//! │  ├── category / name present                                           │
//! │  ├── amount > 0                                                        │
//! │  └── recurrence and document shape                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hosted backend                                               │
//! │  └── NOT NULL, row-level security                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The kind and date of a lançamento are enforced by its types
//! ([`EntryKind`](crate::types::EntryKind) and `NaiveDate`), so only the
//! remaining fields are checked here.

use crate::document::Document;
use crate::error::ValidationError;
use crate::types::{ContactKind, ContactRecord, FinancialRecord};
use crate::{MAX_NAME_LEN, MAX_RECURRENCE_MONTHS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a lançamento before submission.
///
/// ## Rules
/// - Category must not be blank
/// - Amount must be greater than zero
/// - A recurring entry needs 1..=[`MAX_RECURRENCE_MONTHS`] months
///
/// ```rust
/// use chrono::NaiveDate;
/// use fluxo_core::money::Money;
/// use fluxo_core::types::{EntryKind, FinancialRecord};
/// use fluxo_core::validation::validate_record;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let ok = FinancialRecord::new(date, EntryKind::Receita, "Vendas", Money::from_cents(100));
/// assert!(validate_record(&ok).is_ok());
///
/// let zero = FinancialRecord::new(date, EntryKind::Receita, "Vendas", Money::zero());
/// assert!(validate_record(&zero).is_err());
/// ```
pub fn validate_record(record: &FinancialRecord) -> ValidationResult<()> {
    if record.category.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "categoria".to_string(),
        });
    }

    if record.amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "valor".to_string(),
        });
    }

    if record.recurring {
        validate_recurrence_months(record.recurrence_months)?;
    }

    Ok(())
}

/// Validates the month count of a recurring lançamento.
pub fn validate_recurrence_months(months: Option<u32>) -> ValidationResult<()> {
    let months = months.ok_or_else(|| ValidationError::Required {
        field: "meses de recorrência".to_string(),
    })?;

    if months == 0 || months > MAX_RECURRENCE_MONTHS {
        return Err(ValidationError::OutOfRange {
            field: "meses de recorrência".to_string(),
            min: 1,
            max: MAX_RECURRENCE_MONTHS as i64,
        });
    }

    Ok(())
}

/// Validates a contact before submission.
///
/// ## Rules
/// - Name must not be blank and at most [`MAX_NAME_LEN`] characters
/// - Document, when filled, must be a complete CPF or CNPJ
/// - Kind must be one of the known labels (either Funcionário spelling)
pub fn validate_contact(contact: &ContactRecord) -> ValidationResult<()> {
    let name = contact.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nome".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "nome".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if !contact.document.trim().is_empty() {
        Document::parse(&contact.document)?;
    }

    if ContactKind::from_label(&contact.kind).is_none() {
        return Err(ValidationError::NotAllowed {
            field: "tipo".to_string(),
            allowed: [ContactKind::Cliente, ContactKind::Fornecedor, ContactKind::Funcionario]
                .iter()
                .map(|k| k.label().to_string())
                .collect(),
        });
    }

    Ok(())
}
