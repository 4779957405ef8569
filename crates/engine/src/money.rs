use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer minor units**.
///
/// The ledger does not know which currency it is counting, so an `Amount` is
/// just a count of the smallest unit the remote API uses (won, cents, ...).
/// Integers keep sums exact.
///
/// Transaction amounts are never negative; only derived values (for example
/// a period's net) can be.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(50_000);
/// assert_eq!(amount.minor(), 50000);
/// assert_eq!(amount.to_string(), "50,000");
/// ```
///
/// Parsing from user input (accepts `,` or `_` as digit grouping):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("12,000".parse::<Amount>().unwrap().minor(), 12000);
/// assert_eq!("-1_500".parse::<Amount>().unwrap().minor(), -1500);
/// assert!("12.5".parse::<Amount>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Saturating addition, used by the aggregator which must not fail.
    #[must_use]
    pub const fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    #[must_use]
    pub const fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{grouped}")
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parses a whole number of minor units.
    ///
    /// Accepts an optional leading `+`/`-` and `,` or `_` between digits.
    /// Fractions are rejected: amounts are already in minor units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| LedgerError::Validation(format!("{reason}: {s:?}"));

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits: String = rest.chars().filter(|c| *c != ',' && *c != '_').collect();
        if digits.is_empty() {
            return Err(invalid("empty amount"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("invalid amount"));
        }

        let value: i64 = digits.parse().map_err(|_| invalid("amount too large"))?;
        Ok(Amount(if negative { -value } else { value }))
    }
}
