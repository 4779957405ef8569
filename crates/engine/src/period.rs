//! Aggregation periods.
//!
//! Periods nest as `Day ⊂ Month ⊂ Year`. The nesting drives two things: which
//! records an aggregate covers ([`PeriodKey::contains`]) and which cached
//! aggregates a change at a finer period makes stale
//! ([`PeriodKey::ancestors`]).

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "snake_case")]
pub enum PeriodKey {
    Day { date: NaiveDate },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl PeriodKey {
    pub fn day(date: NaiveDate) -> Self {
        Self::Day { date }
    }

    /// Month key; `month` must be in `1..=12`.
    pub fn month(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::Validation(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self::Month { year, month })
    }

    pub fn year(year: i32) -> Self {
        Self::Year { year }
    }

    /// Month key for the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month that has to be fetched to answer this key.
    ///
    /// `None` for years, which span twelve fetches.
    pub fn covering_month(&self) -> Option<(i32, u32)> {
        match *self {
            Self::Day { date } => Some((date.year(), date.month())),
            Self::Month { year, month } => Some((year, month)),
            Self::Year { .. } => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day { date: day } => day == date,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year { year } => date.year() == year,
        }
    }

    /// Coarser keys containing this one, finest first.
    pub fn ancestors(&self) -> Vec<PeriodKey> {
        match *self {
            Self::Day { date } => vec![Self::month_of(date), Self::year(date.year())],
            Self::Month { year, .. } => vec![Self::year(year)],
            Self::Year { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { date } => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Year { year } => write!(f, "{year:04}"),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = LedgerError;

    /// Parses `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::Validation(format!("invalid period: {s:?}"));
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('-').collect();
        match parts.as_slice() {
            [year] => Ok(Self::year(year.parse().map_err(|_| invalid())?)),
            [year, month] => {
                let year = year.parse().map_err(|_| invalid())?;
                let month = month.parse().map_err(|_| invalid())?;
                Self::month(year, month)
            }
            [_, _, _] => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(Self::day)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Number of days in the given calendar month (`0` for an invalid month).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}
