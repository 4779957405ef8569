//! Transaction primitives.
//!
//! A `TransactionRecord` is one ledger entry as the remote API stores it. It
//! is never edited in place: edits go through the facade, which treats them
//! as invalidations of every period the old and new dates fall in.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, LedgerError};

/// Longest description the entry form accepts.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Transfer into savings. Not income, not expense.
    Saving,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::Saving => "SAVING",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            "saving" | "save" => Ok(Self::Saving),
            other => Err(LedgerError::Validation(format!(
                "unknown transaction kind: {other}"
            ))),
        }
    }
}

/// Server-assigned transaction id. Opaque to the client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Always `>= 0`; the sign comes from `kind`.
    pub amount: Amount,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub description: String,
    /// Display ordering only.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating (or replacing) a transaction.
///
/// `amount_minor` is kept raw so that a negative value reaches
/// [`TransactionInput::validate`] instead of being rejected by a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub kind: TransactionKind,
    pub category_id: i64,
    pub description: String,
}

impl TransactionInput {
    pub fn new(
        date: NaiveDate,
        amount_minor: i64,
        kind: TransactionKind,
        category_id: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount_minor,
            kind,
            category_id,
            description: description.into(),
        }
    }

    /// Local checks run before any request leaves the process.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount_minor < 0 {
            return Err(LedgerError::Validation(format!(
                "amount must be >= 0, got {}",
                self.amount_minor
            )));
        }
        let chars = self.description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(LedgerError::Validation(format!(
                "description is {chars} characters, limit is {MAX_DESCRIPTION_CHARS}"
            )));
        }
        Ok(())
    }

    pub fn amount(&self) -> Amount {
        Amount::new(self.amount_minor)
    }
}
