//! Period aggregation.
//!
//! Pure reductions from transaction records to income/expense totals. Input
//! order never matters and nothing here can fail: a period without records
//! is a zeroed summary.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Amount, PeriodKey, TransactionKind, TransactionRecord, period::days_in_month};

/// Totals for one period.
///
/// `net` is not a field: it is derived from `income` and `expense` on every
/// read. Savings are tracked on the side and never enter `net`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub income: Amount,
    pub expense: Amount,
    pub saving: Amount,
    /// Number of records that matched the period, of any kind.
    pub count: u64,
}

impl PeriodSummary {
    pub const EMPTY: PeriodSummary = PeriodSummary {
        income: Amount::ZERO,
        expense: Amount::ZERO,
        saving: Amount::ZERO,
        count: 0,
    };

    pub fn net(&self) -> Amount {
        self.income.saturating_sub(self.expense)
    }

    pub fn add_record(&mut self, record: &TransactionRecord) {
        match record.kind {
            TransactionKind::Income => self.income = self.income.saturating_add(record.amount),
            TransactionKind::Expense => self.expense = self.expense.saturating_add(record.amount),
            TransactionKind::Saving => self.saving = self.saving.saturating_add(record.amount),
        }
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A month's total plus one summary per calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub total: PeriodSummary,
    /// Every day of the month, zeroed where nothing happened.
    pub days: BTreeMap<NaiveDate, PeriodSummary>,
}

impl MonthSummary {
    pub fn key(&self) -> PeriodKey {
        PeriodKey::Month {
            year: self.year,
            month: self.month,
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&PeriodSummary> {
        self.days.get(&date)
    }
}

/// A year's total plus its twelve months.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub total: PeriodSummary,
    /// Keys `1..=12`, always all present.
    pub months: BTreeMap<u32, PeriodSummary>,
}

impl YearSummary {
    pub fn month(&self, month: u32) -> Option<&PeriodSummary> {
        self.months.get(&month)
    }
}

/// Summary of the records that fall in `key`.
pub fn summarize(records: &[TransactionRecord], key: &PeriodKey) -> PeriodSummary {
    records
        .iter()
        .filter(|record| key.contains(record.date))
        .fold(PeriodSummary::EMPTY, |mut acc, record| {
            acc.add_record(record);
            acc
        })
}

/// Month total and every daily total in one pass.
///
/// Records outside the month are ignored.
pub fn summarize_month(records: &[TransactionRecord], year: i32, month: u32) -> MonthSummary {
    let mut days: BTreeMap<NaiveDate, PeriodSummary> = (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| (date, PeriodSummary::EMPTY))
        .collect();
    let mut total = PeriodSummary::EMPTY;

    for record in records {
        if record.date.year() != year || record.date.month() != month {
            continue;
        }
        total.add_record(record);
        if let Some(day) = days.get_mut(&record.date) {
            day.add_record(record);
        }
    }

    MonthSummary {
        year,
        month,
        total,
        days,
    }
}

/// Year total and all twelve monthly totals in one pass.
pub fn summarize_year(records: &[TransactionRecord], year: i32) -> YearSummary {
    let mut months: BTreeMap<u32, PeriodSummary> =
        (1..=12).map(|month| (month, PeriodSummary::EMPTY)).collect();
    let mut total = PeriodSummary::EMPTY;

    for record in records.iter().filter(|record| record.date.year() == year) {
        total.add_record(record);
        if let Some(month) = months.get_mut(&record.date.month()) {
            month.add_record(record);
        }
    }

    YearSummary {
        year,
        total,
        months,
    }
}
