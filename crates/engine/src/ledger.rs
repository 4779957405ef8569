//! Ledger facade.
//!
//! The only entry point the UI talks to. Reads go cache → remote month fetch
//! → aggregator → cache; writes go remote → cache invalidation.
//!
//! - Fetches are always for a whole calendar month, so one round trip fills
//!   the month and every one of its days.
//! - Concurrent fetches of the same month share one in-flight request. The
//!   cache check and the join happen under the same lock.
//! - Every month and year key carries a generation, bumped when the key or
//!   one of its days is invalidated. A fetch commits only if the generations
//!   it started from are unchanged, so callers that observed a mutation's
//!   success never read pre-mutation data.
//! - A year commits its twelve months and its breakdown together, or not at
//!   all.
//! - Cache access is synchronous and never held across an `.await`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{Datelike, NaiveDate};
use tokio::{sync::OnceCell, task::JoinSet};

use crate::{
    ApiError, LedgerApi, LedgerError, MonthSummary, PeriodKey, PeriodSummary, SummaryCache,
    TransactionId, TransactionInput, TransactionRecord, YearSummary, summarize_month,
    summarize_year,
};

type ResultLedger<T> = Result<T, LedgerError>;

/// One month as returned by the remote API, with its aggregates.
#[derive(Debug)]
struct MonthFetch {
    records: Vec<TransactionRecord>,
    summary: MonthSummary,
    /// Generation of the month key when the request was sent.
    generation: u64,
}

type FetchOutcome = Result<Arc<MonthFetch>, ApiError>;
type Slot = Arc<OnceCell<FetchOutcome>>;

/// Result of looking a month up under the state lock.
enum Cached<T> {
    Hit(T),
    Fetch(Slot),
}

#[derive(Debug, Default)]
struct State {
    cache: SummaryCache,
    inflight: HashMap<(i32, u32), Slot>,
    /// Last invalidation of each month and year key.
    touched: HashMap<PeriodKey, u64>,
    /// Last `refresh`.
    cleared: u64,
    clock: u64,
}

impl State {
    fn generation(&self, key: &PeriodKey) -> u64 {
        self.touched
            .get(key)
            .copied()
            .unwrap_or(0)
            .max(self.cleared)
    }

    fn slot(&mut self, year: i32, month: u32) -> Slot {
        Arc::clone(self.inflight.entry((year, month)).or_default())
    }

    /// Forgets `slot` unless a newer fetch already replaced it.
    fn release(&mut self, year: i32, month: u32, slot: &Slot) {
        if self
            .inflight
            .get(&(year, month))
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            self.inflight.remove(&(year, month));
        }
    }
}

struct Shared<A> {
    api: A,
    state: Mutex<State>,
}

/// Cached, coalescing view over a remote ledger.
///
/// Cloning is cheap and clones share the same cache.
pub struct Ledger<A> {
    inner: Arc<Shared<A>>,
}

impl<A> Clone for Ledger<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: LedgerApi> Ledger<A> {
    /// Wraps an already authenticated API client.
    pub fn new(api: A) -> Self {
        Self {
            inner: Arc::new(Shared {
                api,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Income/expense totals for `key`.
    ///
    /// Served from cache when possible. A miss on a day or month fetches the
    /// whole month; a miss on a year goes through [`Ledger::year_summary`].
    /// On failure the cache is left as it was.
    pub async fn summary(&self, key: PeriodKey) -> ResultLedger<PeriodSummary> {
        let (year, month) = match key {
            PeriodKey::Year { year } => return Ok(self.year_summary(year).await?.total),
            PeriodKey::Month { year, month } => (year, month),
            PeriodKey::Day { date } => (date.year(), date.month()),
        };

        let slot = match self.inner.lookup(year, month, |cache| cache.get(&key)) {
            Cached::Hit(hit) => {
                tracing::debug!("summary cache hit for {key}");
                return Ok(hit);
            }
            Cached::Fetch(slot) => slot,
        };
        tracing::debug!("summary cache miss for {key}");

        let fetched = self.inner.load_month(year, month, slot).await?;
        Ok(match key {
            PeriodKey::Day { date } => fetched
                .summary
                .day(date)
                .copied()
                .unwrap_or(PeriodSummary::EMPTY),
            _ => fetched.summary.total,
        })
    }

    /// The year total and its twelve months, computed in one pass.
    ///
    /// The twelve month fetches run concurrently and join any fetch of the
    /// same month already in flight. Nothing is cached unless all twelve
    /// succeed; the months and the year are then committed together.
    pub async fn year_summary(&self, year: i32) -> ResultLedger<YearSummary> {
        let year_key = PeriodKey::year(year);
        let (generation, slots) = {
            let mut state = self.inner.state();
            if let Some(hit) = state.cache.get_year(year).cloned() {
                tracing::debug!("year breakdown cache hit for {year}");
                return Ok(hit);
            }
            let slots: Vec<(u32, Slot)> = (1..=12)
                .map(|month| (month, state.slot(year, month)))
                .collect();
            (state.generation(&year_key), slots)
        };

        let mut tasks = JoinSet::new();
        for (month, slot) in &slots {
            let inner = Arc::clone(&self.inner);
            let (month, slot) = (*month, Arc::clone(slot));
            tasks.spawn(async move { inner.resolve(year, month, &slot).await });
        }

        let mut months = Vec::with_capacity(slots.len());
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.unwrap_or_else(|err| {
                Err(ApiError::Transport(format!("month fetch aborted: {err}")))
            });
            match outcome {
                Ok(fetched) => months.push(fetched),
                Err(err) => {
                    tasks.abort_all();
                    self.inner.release_settled(year, &slots);
                    tracing::warn!("year {year} not cached: {err}");
                    return Err(LedgerError::Fetch(err));
                }
            }
        }

        let records: Vec<TransactionRecord> = months
            .iter()
            .flat_map(|fetched| fetched.records.iter().cloned())
            .collect();
        let summary = summarize_year(&records, year);

        let mut state = self.inner.state();
        let fresh = state.generation(&year_key) == generation
            && months
                .iter()
                .all(|fetched| state.generation(&fetched.summary.key()) == fetched.generation);
        for (month, slot) in &slots {
            state.release(year, *month, slot);
        }
        if fresh {
            for fetched in &months {
                state.cache.put_month(&fetched.summary);
            }
            state.cache.put_year(summary.clone());
            tracing::debug!("committed year breakdown for {year}");
        } else {
            tracing::debug!("discarding year breakdown for {year}: invalidated while fetching");
        }
        Ok(summary)
    }

    /// Month total plus a summary for every day of the month.
    pub async fn daily_summaries(&self, year: i32, month: u32) -> ResultLedger<MonthSummary> {
        let key = PeriodKey::month(year, month)?;
        let slot = match self
            .inner
            .lookup(year, month, |cache| cache.get_month(year, month))
        {
            Cached::Hit(hit) => {
                tracing::debug!("daily summaries cache hit for {key}");
                return Ok(hit);
            }
            Cached::Fetch(slot) => slot,
        };
        let fetched = self.inner.load_month(year, month, slot).await?;
        Ok(fetched.summary.clone())
    }

    /// Records of one month, newest first.
    ///
    /// Records are not cached, so this always reaches the API (sharing any
    /// fetch of the month already in flight).
    pub async fn transactions(
        &self,
        year: i32,
        month: u32,
    ) -> ResultLedger<Vec<TransactionRecord>> {
        let key = PeriodKey::month(year, month)?;
        let slot = self.inner.state().slot(year, month);
        let fetched = self.inner.load_month(year, month, slot).await?;
        let mut records: Vec<TransactionRecord> = fetched
            .records
            .iter()
            .filter(|record| key.contains(record.date))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(records)
    }

    /// Creates a transaction remotely, then invalidates its day (and so its
    /// month and year).
    pub async fn create_transaction(
        &self,
        input: TransactionInput,
    ) -> ResultLedger<TransactionRecord> {
        input.validate()?;

        let record = self
            .inner
            .api
            .create_transaction(&input)
            .await
            .map_err(|err| {
                tracing::warn!("create transaction rejected: {err}");
                LedgerError::Remote(err)
            })?;

        self.inner.invalidate_dates(&[input.date, record.date]);
        tracing::info!("created transaction {} on {}", record.id, record.date);
        Ok(record)
    }

    /// Replaces a transaction remotely. Both the old and the new date are
    /// invalidated.
    pub async fn update_transaction(
        &self,
        id: &TransactionId,
        previous_date: NaiveDate,
        input: TransactionInput,
    ) -> ResultLedger<TransactionRecord> {
        input.validate()?;

        let record = match self.inner.api.update_transaction(id, &input).await {
            Ok(record) => record,
            Err(ApiError::NotFound) => return Err(LedgerError::NotFound(id.clone())),
            Err(err) => {
                tracing::warn!("update of transaction {id} rejected: {err}");
                return Err(LedgerError::Remote(err));
            }
        };

        self.inner.invalidate_dates(&[previous_date, input.date, record.date]);
        tracing::info!("updated transaction {id} ({previous_date} -> {})", record.date);
        Ok(record)
    }

    /// Deletes a transaction remotely, then invalidates `date`.
    ///
    /// The cache is keyed by period, so the caller supplies the date the
    /// record was filed under.
    pub async fn delete_transaction(
        &self,
        id: &TransactionId,
        date: NaiveDate,
    ) -> ResultLedger<()> {
        match self.inner.api.delete_transaction(id).await {
            Ok(()) => {}
            Err(ApiError::NotFound) => return Err(LedgerError::NotFound(id.clone())),
            Err(err) => {
                tracing::warn!("delete of transaction {id} rejected: {err}");
                return Err(LedgerError::Remote(err));
            }
        }

        self.inner.invalidate_dates(&[date]);
        tracing::info!("deleted transaction {id} on {date}");
        Ok(())
    }

    /// Drops every cached summary. Nothing is refetched until asked for.
    pub fn refresh(&self) {
        let mut state = self.inner.state();
        state.cache.invalidate_all();
        state.inflight.clear();
        state.clock += 1;
        state.cleared = state.clock;
        tracing::info!("summary cache cleared");
    }

    /// Removes `key` (and the coarser entries containing it) from the cache.
    pub fn invalidate(&self, key: &PeriodKey) {
        self.inner.invalidate_keys(std::slice::from_ref(key));
    }

    /// Cached value for `key` without touching the API.
    pub fn cached_summary(&self, key: &PeriodKey) -> Option<PeriodSummary> {
        self.inner.state().cache.get(key)
    }
}

impl<A: LedgerApi> Shared<A> {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks the cache and, on a miss, joins the month's fetch without
    /// releasing the lock in between.
    fn lookup<T>(
        &self,
        year: i32,
        month: u32,
        hit: impl FnOnce(&SummaryCache) -> Option<T>,
    ) -> Cached<T> {
        let mut state = self.state();
        match hit(&state.cache) {
            Some(value) => Cached::Hit(value),
            None => Cached::Fetch(state.slot(year, month)),
        }
    }

    /// Waits for `slot` and commits the month it yields.
    async fn load_month(
        &self,
        year: i32,
        month: u32,
        slot: Slot,
    ) -> ResultLedger<Arc<MonthFetch>> {
        let fetched = self
            .resolve(year, month, &slot)
            .await
            .map_err(LedgerError::Fetch)?;

        let mut state = self.state();
        state.release(year, month, &slot);
        if state.generation(&fetched.summary.key()) == fetched.generation {
            state.cache.put_month(&fetched.summary);
            tracing::debug!(
                "committed {year}-{month:02}: {} records, {} days",
                fetched.records.len(),
                fetched.summary.days.len()
            );
        } else {
            tracing::debug!("discarding {year}-{month:02}: invalidated while fetching");
        }
        Ok(fetched)
    }

    /// Runs or joins the fetch behind `slot`. Nothing is committed here.
    ///
    /// If the caller driving the fetch goes away, one of the remaining
    /// waiters restarts it.
    async fn resolve(&self, year: i32, month: u32, slot: &Slot) -> FetchOutcome {
        slot.get_or_init(|| self.fetch_month(year, month, slot))
            .await
            .clone()
    }

    async fn fetch_month(&self, year: i32, month: u32, slot: &Slot) -> FetchOutcome {
        let key = PeriodKey::Month { year, month };
        let generation = self.state().generation(&key);
        tracing::debug!("fetching transactions for {key}");

        match self.api.list_transactions(year, month).await {
            Ok(records) => {
                let summary = summarize_month(&records, year, month);
                Ok(Arc::new(MonthFetch {
                    records,
                    summary,
                    generation,
                }))
            }
            Err(err) => {
                tracing::warn!("fetching {key} failed: {err}");
                self.state().release(year, month, slot);
                Err(err)
            }
        }
    }

    /// Drops the slots of `year` whose fetch already finished, so a retry
    /// asks the API again. Fetches still running stay joinable.
    fn release_settled(&self, year: i32, slots: &[(u32, Slot)]) {
        let mut state = self.state();
        for (month, slot) in slots {
            if slot.initialized() {
                state.release(year, *month, slot);
            }
        }
    }

    fn invalidate_dates(&self, dates: &[NaiveDate]) {
        let keys: Vec<PeriodKey> = dates.iter().copied().map(PeriodKey::day).collect();
        self.invalidate_keys(&keys);
    }

    fn invalidate_keys(&self, keys: &[PeriodKey]) {
        let mut state = self.state();
        state.clock += 1;
        let clock = state.clock;
        for key in keys {
            state.cache.invalidate(key);
            for touched in std::iter::once(*key).chain(key.ancestors()) {
                if !matches!(touched, PeriodKey::Day { .. }) {
                    state.touched.insert(touched, clock);
                }
            }
            if let Some(month) = key.covering_month() {
                state.inflight.remove(&month);
            }
        }
    }
}
