//! Ledger aggregation service.
//!
//! Turns the raw transactions of a remote ledger into income/expense/net
//! summaries per day, month and year, and keeps those summaries cached until a
//! mutation makes them stale.
//!
//! - [`aggregate`] holds the pure reductions.
//! - [`SummaryCache`] maps periods to summaries with upward invalidation.
//! - [`Ledger`] is the facade: fetch, aggregate, cache, mutate.
//! - [`LedgerApi`] is the remote collaborator the facade is built on.

pub use aggregate::{
    MonthSummary, PeriodSummary, YearSummary, summarize, summarize_month, summarize_year,
};
pub use api::LedgerApi;
pub use cache::SummaryCache;
pub use error::{ApiError, LedgerError};
pub use ledger::Ledger;
pub use money::Amount;
pub use period::{PeriodKey, days_in_month};
pub use transactions::{
    MAX_DESCRIPTION_CHARS, TransactionId, TransactionInput, TransactionKind, TransactionRecord,
};

pub mod aggregate;
mod api;
mod cache;
mod error;
mod ledger;
mod money;
mod period;
mod transactions;
