//! # Statements
//!
//! DRE (Demonstração do Resultado do Exercício), cash summary and bank
//! balance consolidation, all derived from lançamentos.
//!
//! ## DRE Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DRE  01/01/2024 – 31/03/2024                                          │
//! │                                                                         │
//! │  (+) Receita bruta                               R$ 30.000,00          │
//! │        Serviços                R$ 18.000,00                            │
//! │        Vendas                  R$ 12.000,00                            │
//! │  (−) Despesas                                    R$ 21.500,00          │
//! │        Aluguel                 R$  4.500,00                            │
//! │        Salários                R$ 17.000,00                            │
//! │  (=) Resultado líquido                           R$  8.500,00  28,33 % │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The period is selected with the same [`FilterState`] the ledger screen
//! uses, so the DRE and the list always agree on which entries count.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::filter::{apply, FilterState};
use crate::money::Money;
use crate::types::{BankAccount, EntryKind, FinancialRecord, Percentage};

// =============================================================================
// Income Statement
// =============================================================================

/// Total of one category within a DRE section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    /// Share of the section total.
    pub share: Option<Percentage>,
}

/// A period income statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    pub gross_revenue: Money,
    pub revenue_by_category: Vec<CategoryTotal>,
    pub total_expenses: Money,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub net_result: Money,
    /// Net result over gross revenue, in percent. `None` without revenue.
    pub net_margin: Option<f64>,
    pub entry_count: usize,
}

impl IncomeStatement {
    /// Builds the DRE for the entries selected by `period`.
    ///
    /// Only the date range of `period` matters for a DRE, but the whole
    /// filter is applied so a category search narrows the report too.
    pub fn build(records: &[FinancialRecord], period: &FilterState) -> Self {
        let selected = apply(records, period);

        let mut revenue: BTreeMap<&str, Money> = BTreeMap::new();
        let mut expenses: BTreeMap<&str, Money> = BTreeMap::new();
        for record in &selected {
            let section = match record.kind {
                EntryKind::Receita => &mut revenue,
                EntryKind::Despesa => &mut expenses,
            };
            *section.entry(record.category.trim()).or_default() += record.amount();
        }

        let gross_revenue: Money = revenue.values().sum();
        let total_expenses: Money = expenses.values().sum();
        let net_result = gross_revenue - total_expenses;

        let net_margin = if gross_revenue.is_positive() {
            Some(net_result.cents() as f64 / gross_revenue.cents() as f64 * 100.0)
        } else {
            None
        };

        IncomeStatement {
            start_date: period.start_date(),
            end_date: period.end_date(),
            revenue_by_category: category_totals(&revenue, gross_revenue),
            expenses_by_category: category_totals(&expenses, total_expenses),
            gross_revenue,
            total_expenses,
            net_result,
            net_margin,
            entry_count: selected.len(),
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.net_result.is_positive()
    }
}

fn category_totals(section: &BTreeMap<&str, Money>, section_total: Money) -> Vec<CategoryTotal> {
    section
        .iter()
        .map(|(category, total)| CategoryTotal {
            category: (*category).to_string(),
            total: *total,
            share: total.share_of(section_total),
        })
        .collect()
}

// =============================================================================
// Monthly Results
// =============================================================================

/// Revenue, expenses and result of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyResult {
    pub year: i32,
    pub month: u32,
    pub revenue: Money,
    pub expenses: Money,
    pub net_result: Money,
}

/// Groups entries by month, oldest first (dashboard chart).
pub fn monthly_results(records: &[FinancialRecord]) -> Vec<MonthlyResult> {
    let mut months: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();
    for record in records {
        let slot = months
            .entry((record.date.year(), record.date.month()))
            .or_default();
        match record.kind {
            EntryKind::Receita => slot.0 += record.amount(),
            EntryKind::Despesa => slot.1 += record.amount(),
        }
    }

    months
        .into_iter()
        .map(|((year, month), (revenue, expenses))| MonthlyResult {
            year,
            month,
            revenue,
            expenses,
            net_result: revenue - expenses,
        })
        .collect()
}

// =============================================================================
// Cash Summary
// =============================================================================

/// Inflow, outflow and balance of a set of lançamentos (dashboard cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashSummary {
    pub inflow: Money,
    pub outflow: Money,
    pub balance: Money,
}

impl CashSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FinancialRecord>,
    {
        let mut summary = CashSummary::default();
        for record in records {
            match record.kind {
                EntryKind::Receita => summary.inflow += record.amount(),
                EntryKind::Despesa => summary.outflow += record.amount(),
            }
        }
        summary.balance = summary.inflow - summary.outflow;
        summary
    }
}

/// Sum of every account balance (the "Saldo total" card).
pub fn consolidated_balance(accounts: &[BankAccount]) -> Money {
    accounts.iter().map(BankAccount::balance).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
