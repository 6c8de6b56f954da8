//! # fluxo-core: Pure Financial Logic for Fluxo
//!
//! This crate is the **heart** of Fluxo. It holds every calculation the
//! small-business finance screens perform, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Fluxo Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front end (browser)                          │   │
//! │  │   Lançamentos ── Cadastros ── Precificação ── Ponto de equilíbrio│  │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 fluxo-app (views, services, config)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fluxo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐           │   │
//! │  │  │ currency │ │ document │ │  filter  │ │pagination│           │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘           │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐           │   │
//! │  │  │ pricing  │ │break_even│ │statement │ │validation│           │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND CALLS • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` in integer centavos
//! - [`currency`] - pt-BR currency parse/format/validate
//! - [`document`] - CPF/CNPJ/phone masks
//! - [`filter`] - stable compound record filter
//! - [`pagination`] - page windows
//! - [`pricing`] - hourly rate and additive-margin pricing
//! - [`break_even`] - pró-labore ceiling and break-even revenue
//! - [`statement`] - DRE, cash summary, bank balances
//! - [`recurrence`] - monthly expansion of recurring lançamentos
//! - [`validation`] - submission rules
//! - [`types`] - domain records
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fluxo_core::currency;
//! use fluxo_core::pricing::compute_final_price;
//! use fluxo_core::types::Percentage;
//!
//! let cost = currency::parse("R$ 100,00");
//! let price = compute_final_price(cost, Percentage::from_percent(20.0));
//! assert_eq!(currency::format(price.final_price), "R$ 120,00");
//! ```

pub mod break_even;
pub mod currency;
pub mod document;
pub mod error;
pub mod filter;
pub mod money;
pub mod pagination;
pub mod pricing;
pub mod recurrence;
pub mod statement;
pub mod types;
pub mod validation;

// Re-exports so callers can write `fluxo_core::Money`.
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::{FilterState, Filterable};
pub use money::Money;
pub use pagination::PageWindow;
pub use types::*;

/// Longest recurrence a lançamento may request (five years of months).
pub const MAX_RECURRENCE_MONTHS: u32 = 60;

/// Longest contact name accepted on submission.
pub const MAX_NAME_LEN: usize = 200;
