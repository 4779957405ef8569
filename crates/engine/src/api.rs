use std::future::Future;

use crate::{ApiError, TransactionId, TransactionInput, TransactionRecord};

/// The remote ledger the facade reads from and writes to.
///
/// Implementations own transport and credentials. They are expected to be
/// already authenticated when handed to [`crate::Ledger`].
pub trait LedgerApi: Send + Sync + 'static {
    /// Every record dated inside the given calendar month.
    fn list_transactions(
        &self,
        year: i32,
        month: u32,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, ApiError>> + Send;

    fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> impl Future<Output = Result<TransactionRecord, ApiError>> + Send;

    /// Replaces the stored fields of `id` with `input`.
    fn update_transaction(
        &self,
        id: &TransactionId,
        input: &TransactionInput,
    ) -> impl Future<Output = Result<TransactionRecord, ApiError>> + Send;

    fn delete_transaction(
        &self,
        id: &TransactionId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
