//! # fluxo-app: Orchestration Layer for Fluxo
//!
//! Glue between the front end, the hosted backend and [`fluxo_core`].
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          fluxo-app                                      │
//! │                                                                         │
//! │  ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────────────┐   │
//! │  │  view     │  │  ledger    │  │  contacts  │  │   calculator     │   │
//! │  │ (filter + │  │ (submit,   │  │ (submit,   │  │ (pricing, break- │   │
//! │  │  paging)  │  │  DRE)      │  │  status)   │  │  even forms)     │   │
//! │  └───────────┘  └─────┬──────┘  └─────┬──────┘  └──────────────────┘   │
//! │                       │               │                                 │
//! │  ┌────────────────────▼───────────────▼─────────────────────────────┐  │
//! │  │  Collaborators: store (RecordStore), profile (KeyValueStore),    │  │
//! │  │                 session (current user)                           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Ambient: config (TOML + FLUXO_*), logging (tracing), error (ApiError) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `AppConfig` loading and validation
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - `AppError` and the front-end `ApiError`
//! - [`store`] - async `RecordStore` seam and `MemoryStore`
//! - [`profile`] - business profile over a `KeyValueStore`
//! - [`session`] - current user
//! - [`view`] - list-screen state
//! - [`ledger`] - lançamento workflows and reports
//! - [`contacts`] - cadastro workflows
//! - [`calculator`] - pricing and break-even forms

pub mod calculator;
pub mod config;
pub mod contacts;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod profile;
pub mod session;
pub mod store;
pub mod view;

pub use config::AppConfig;
pub use error::{ApiError, AppError, AppResult, ErrorCode};
pub use session::Session;
pub use store::{MemoryStore, RecordStore};
pub use view::{RecordView, ViewPage};
