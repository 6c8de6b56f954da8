//! # Record Store
//!
//! Persistence seam between the services and the hosted backend.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Records Live                                   │
//! │                                                                         │
//! │  LedgerService / ContactService                                        │
//! │       │                                                                 │
//! │       │  store.fetch_records() / submit(r) / delete(id)                │
//! │       ▼                                                                 │
//! │  RecordStore<T>  (trait)                                               │
//! │  ├── MemoryStore<T>        tests, fluxo-report, offline demos          │
//! │  └── <backend adapter>     lives with the host, not in this crate      │
//! │                                                                         │
//! │  The services never know which one they talk to.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use fluxo_core::{BankAccount, ContactRecord, FinancialRecord};

use crate::error::{AppError, AppResult};

// =============================================================================
// Stored Record
// =============================================================================

/// A record with a stable string id.
pub trait StoredRecord: Clone + Send + Sync + 'static {
    /// Name used in "not found" messages.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
}

impl StoredRecord for FinancialRecord {
    const ENTITY: &'static str = "Lançamento";

    fn id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for ContactRecord {
    const ENTITY: &'static str = "Cadastro";

    fn id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for BankAccount {
    const ENTITY: &'static str = "Conta bancária";

    fn id(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Record Store Trait
// =============================================================================

/// Async persistence collaborator for one record type.
pub trait RecordStore<T: StoredRecord>: Send + Sync {
    /// Every record visible to the current user.
    fn fetch_records(&self) -> impl Future<Output = AppResult<Vec<T>>> + Send;

    /// Inserts `record`, or replaces the one with the same id.
    fn submit(&self, record: T) -> impl Future<Output = AppResult<T>> + Send;

    /// Removes the record with `id`. Unknown ids are `NotFound`.
    fn delete(&self, id: &str) -> impl Future<Output = AppResult<()>> + Send;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A `RecordStore` backed by a vector, in insertion order.
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: StoredRecord> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        MemoryStore {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: StoredRecord> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredRecord> RecordStore<T> for MemoryStore<T> {
    async fn fetch_records(&self) -> AppResult<Vec<T>> {
        let records = self.records.read().await;
        debug!(entity = T::ENTITY, count = records.len(), "Fetched records");
        Ok(records.clone())
    }

    async fn submit(&self, record: T) -> AppResult<T> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                debug!(entity = T::ENTITY, id = %record.id(), "Replacing record");
                *existing = record.clone();
            }
            None => {
                debug!(entity = T::ENTITY, id = %record.id(), "Inserting record");
                records.push(record.clone());
            }
        }
        Ok(record)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return Err(AppError::NotFound {
                entity: T::ENTITY.to_string(),
                id: id.to_string(),
            });
        }

        debug!(entity = T::ENTITY, id = %id, "Deleted record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fluxo_core::{EntryKind, Money};

    fn sale(reais: i64) -> FinancialRecord {
        FinancialRecord::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            EntryKind::Receita,
            "Vendas",
            Money::from_cents(reais * 100),
        )
    }

    #[tokio::test]
    async fn test_submit_inserts_then_replaces() {
        let store = MemoryStore::new();
        let mut record = sale(100);

        store.submit(record.clone()).await.unwrap();
        record.amount_cents = 20_000;
        store.submit(record.clone()).await.unwrap();

        let records = store.fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount_cents, 20_000);
    }

    #[tokio::test]
    async fn test_delete() {
        let first = sale(1);
        let second = sale(2);
        let store = MemoryStore::with_records(vec![first.clone(), second.clone()]);

        store.delete(&first.id).await.unwrap();
        let records = store.fetch_records().await.unwrap();
        assert_eq!(records, vec![second]);

        let err = store.delete(&first.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref entity, .. } if entity == "Lançamento"));
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let store: MemoryStore<FinancialRecord> = MemoryStore::new();
        let handle = store.clone();
        handle.submit(sale(5)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
