//! In-memory period summary cache.
//!
//! Entries live until something invalidates them; there is no expiry. The
//! cache itself is not synchronized, [`crate::Ledger`] keeps it behind a
//! mutex.

use std::collections::HashMap;

use crate::{MonthSummary, PeriodKey, PeriodSummary, YearSummary};

#[derive(Debug, Default)]
pub struct SummaryCache {
    summaries: HashMap<PeriodKey, PeriodSummary>,
    years: HashMap<i32, YearSummary>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached summary for `key`, `None` on a miss.
    pub fn get(&self, key: &PeriodKey) -> Option<PeriodSummary> {
        self.summaries.get(key).copied()
    }

    /// Cached twelve-month breakdown for `year`.
    pub fn get_year(&self, year: i32) -> Option<&YearSummary> {
        self.years.get(&year)
    }

    /// Cached month together with all of its days.
    ///
    /// `None` unless the month and every one of its days are present.
    pub fn get_month(&self, year: i32, month: u32) -> Option<MonthSummary> {
        let key = PeriodKey::month(year, month).ok()?;
        let total = self.get(&key)?;
        let days = (1..=crate::period::days_in_month(year, month))
            .map(|day| {
                let date = chrono::NaiveDate::from_ymd_opt(year, month, day)?;
                Some((date, self.get(&PeriodKey::day(date))?))
            })
            .collect::<Option<_>>()?;
        Some(MonthSummary {
            year,
            month,
            total,
            days,
        })
    }

    pub fn put(&mut self, key: PeriodKey, summary: PeriodSummary) {
        self.summaries.insert(key, summary);
    }

    /// Stores the month total and each daily total.
    pub fn put_month(&mut self, month: &MonthSummary) {
        self.summaries.insert(month.key(), month.total);
        for (date, summary) in &month.days {
            self.summaries.insert(PeriodKey::day(*date), *summary);
        }
    }

    /// Stores the year total and its monthly breakdown.
    ///
    /// The months are kept only as part of the breakdown, they do not fill
    /// `Month` keys: those are owned by month fetches.
    pub fn put_year(&mut self, year: YearSummary) {
        self.summaries.insert(PeriodKey::year(year.year), year.total);
        self.years.insert(year.year, year);
    }

    /// Removes `key` and every coarser entry containing it.
    pub fn invalidate(&mut self, key: &PeriodKey) {
        self.remove(key);
        for ancestor in key.ancestors() {
            self.remove(&ancestor);
        }
    }

    pub fn invalidate_all(&mut self) {
        self.summaries.clear();
        self.years.clear();
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    fn remove(&mut self, key: &PeriodKey) {
        self.summaries.remove(key);
        if let PeriodKey::Year { year } = key {
            self.years.remove(year);
        }
    }
}
