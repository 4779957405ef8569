//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`Fetch`] when the remote ledger could not list a month of transactions.
//! - [`Validation`] when a transaction fails local checks before any request.
//! - [`Remote`] when the remote ledger rejected a mutation.
//! - [`NotFound`] when the remote ledger does not know the transaction id.
//!
//! [`ApiError`] is what a [`LedgerApi`] implementation reports; the facade
//! wraps it unchanged into one of the variants above.
//!
//!  [`Fetch`]: LedgerError::Fetch
//!  [`Validation`]: LedgerError::Validation
//!  [`Remote`]: LedgerError::Remote
//!  [`NotFound`]: LedgerError::NotFound
//!  [`LedgerApi`]: crate::LedgerApi
use thiserror::Error;

use crate::TransactionId;

/// Ledger facade errors.
///
/// Cloneable because a single failed fetch is handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("failed to fetch transactions: {0}")]
    Fetch(ApiError),
    #[error("invalid transaction: {0}")]
    Validation(String),
    #[error("remote ledger rejected the request: {0}")]
    Remote(ApiError),
    #[error("transaction \"{0}\" not found")]
    NotFound(TransactionId),
}

/// Failure reported by the remote ledger API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}
