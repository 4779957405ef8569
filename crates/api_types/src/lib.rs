//! Wire types of the remote ledger REST API.
//!
//! Plain serde structs with no behaviour; `api_client` maps them to and from
//! the engine's types.

use serde::{Deserialize, Serialize};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod transaction {
    use chrono::{DateTime, FixedOffset, NaiveDate};

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionKind {
        Income,
        Expense,
        Saving,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub year: i32,
        /// Calendar month, `1..=12`.
        pub month: u32,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: String,
        /// ISO 8601 calendar date (`YYYY-MM-DD`).
        pub date: NaiveDate,
        /// Non-negative minor units; the sign comes from `kind`.
        pub amount: i64,
        pub kind: TransactionKind,
        pub category_id: i64,
        #[serde(default)]
        pub description: String,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Body of `POST /transactions` and `PUT /transactions/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub date: NaiveDate,
        pub amount: i64,
        pub kind: TransactionKind,
        pub category_id: i64,
        pub description: String,
        /// Optional idempotency key for safely retrying the same create request.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub idempotency_key: Option<String>,
    }
}
