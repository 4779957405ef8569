use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use tokio::sync::Semaphore;

use engine::{
    Amount, ApiError, Ledger, LedgerApi, LedgerError, PeriodKey, PeriodSummary, TransactionId,
    TransactionInput, TransactionKind, TransactionRecord,
};

#[derive(Default)]
struct FakeApi {
    records: Mutex<Vec<TransactionRecord>>,
    next_id: AtomicU64,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    fail_list: AtomicBool,
    /// Month whose list call fails after a short delay; 0 for none.
    fail_month: AtomicU32,
    fail_mutations: AtomicBool,
    gate: Option<Arc<Semaphore>>,
}

impl FakeApi {
    fn with(records: Vec<TransactionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// List calls block until the test adds a permit to `gate`.
    fn gated(records: Vec<TransactionRecord>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::with(records)
        }
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    fn apply(&self, id: TransactionId, input: &TransactionInput) -> TransactionRecord {
        TransactionRecord {
            id,
            date: input.date,
            amount: input.amount(),
            kind: input.kind,
            category_id: input.category_id,
            description: input.description.clone(),
            created_at: Utc::now(),
        }
    }
}

impl LedgerApi for FakeApi {
    async fn list_transactions(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<TransactionRecord>, ApiError> {
        let snapshot: Vec<TransactionRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .cloned()
            .collect();
        // Counted after the snapshot so tests can mutate once they see the call.
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|_| ApiError::Transport("gate closed".to_string()))?;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Server("list unavailable".to_string()));
        }
        if self.fail_month.load(Ordering::SeqCst) == month {
            tokio::time::sleep(Duration::from_millis(50)).await;
            return Err(ApiError::Server(format!("{year}-{month:02} unavailable")));
        }
        Ok(snapshot)
    }

    async fn create_transaction(
        &self,
        input: &TransactionInput,
    ) -> Result<TransactionRecord, ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::Validation("category does not exist".to_string()));
        }
        let id = TransactionId::new(format!(
            "tx-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst)
        ));
        let record = self.apply(id, input);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        input: &TransactionInput,
    ) -> Result<TransactionRecord, ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::Conflict("stale".to_string()));
        }
        let updated = self.apply(id.clone(), input);
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or(ApiError::NotFound)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ApiError::Server("maintenance".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(id: &str, date: NaiveDate, amount: i64, kind: TransactionKind) -> TransactionRecord {
    TransactionRecord {
        id: TransactionId::from(id),
        date,
        amount: Amount::new(amount),
        kind,
        category_id: 1,
        description: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}

fn march_fifth() -> Vec<TransactionRecord> {
    vec![
        record("salary", date(2024, 3, 5), 50_000, TransactionKind::Income),
        record("groceries", date(2024, 3, 5), 12_000, TransactionKind::Expense),
    ]
}

fn march() -> PeriodKey {
    PeriodKey::month(2024, 3).unwrap()
}

fn expense_on(date: NaiveDate, amount_minor: i64) -> TransactionInput {
    TransactionInput::new(date, amount_minor, TransactionKind::Expense, 2, "coffee")
}

async fn wait_for_list_calls(api: &FakeApi, expected: usize) {
    for _ in 0..400 {
        if api.list_calls() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {expected} list calls, saw {}", api.list_calls());
}

#[tokio::test]
async fn day_summary_nets_income_and_expense() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));

    let summary = ledger.summary(PeriodKey::day(date(2024, 3, 5))).await.unwrap();

    assert_eq!(summary.income, Amount::new(50_000));
    assert_eq!(summary.expense, Amount::new(12_000));
    assert_eq!(summary.net(), Amount::new(38_000));
}

#[tokio::test]
async fn month_fetch_fills_every_day_of_the_month() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));

    let month = ledger.summary(march()).await.unwrap();
    assert_eq!(month.net(), Amount::new(38_000));
    assert_eq!(ledger.api().list_calls(), 1);

    // Same month, different days: no further round trips.
    let fifth = ledger.summary(PeriodKey::day(date(2024, 3, 5))).await.unwrap();
    let sixth = ledger.summary(PeriodKey::day(date(2024, 3, 6))).await.unwrap();
    assert_eq!(fifth, month);
    assert_eq!(sixth, PeriodSummary::EMPTY);
    assert_eq!(ledger.api().list_calls(), 1);

    let days = ledger.daily_summaries(2024, 3).await.unwrap();
    assert_eq!(days.days.len(), 31);
    assert_eq!(ledger.api().list_calls(), 1);
}

#[tokio::test]
async fn empty_year_is_zeroed_with_twelve_months() {
    let ledger = Ledger::new(FakeApi::default());

    let year = ledger.year_summary(2024).await.unwrap();

    assert_eq!(year.total, PeriodSummary::EMPTY);
    assert_eq!(year.months.len(), 12);
    assert!(year.months.values().all(|m| *m == PeriodSummary::EMPTY));
    assert_eq!(ledger.api().list_calls(), 12);

    let total = ledger.summary(PeriodKey::year(2024)).await.unwrap();
    assert_eq!(total.net(), Amount::ZERO);
    assert_eq!(ledger.api().list_calls(), 12);
}

#[tokio::test]
async fn year_breakdown_splits_by_month() {
    let mut records = march_fifth();
    records.push(record("bonus", date(2024, 12, 24), 7_000, TransactionKind::Income));
    records.push(record("rent", date(2024, 1, 1), 30_000, TransactionKind::Expense));
    let ledger = Ledger::new(FakeApi::with(records));

    let year = ledger.year_summary(2024).await.unwrap();

    assert_eq!(year.month(3).unwrap().net(), Amount::new(38_000));
    assert_eq!(year.month(12).unwrap().income, Amount::new(7_000));
    assert_eq!(year.month(1).unwrap().expense, Amount::new(30_000));
    assert_eq!(year.total.net(), Amount::new(15_000));

    // Months were committed by the same fetches.
    assert_eq!(
        ledger.cached_summary(&march()).map(|s| s.net()),
        Some(Amount::new(38_000))
    );
}

#[tokio::test]
async fn created_transaction_shows_up_in_its_month() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let before = ledger.summary(march()).await.unwrap();
    assert_eq!(before.expense, Amount::new(12_000));

    let created = ledger
        .create_transaction(expense_on(date(2024, 3, 5), 3_000))
        .await
        .unwrap();
    assert_eq!(created.amount, Amount::new(3_000));
    assert!(ledger.cached_summary(&march()).is_none());

    let after = ledger.summary(march()).await.unwrap();
    assert_eq!(after.expense, Amount::new(15_000));
    assert_eq!(after.net(), Amount::new(35_000));
    assert_eq!(ledger.api().list_calls(), 2);
}

#[tokio::test]
async fn create_then_day_summary_round_trip() {
    let ledger = Ledger::new(FakeApi::default());
    let day = PeriodKey::day(date(2024, 7, 14));
    assert_eq!(ledger.summary(day).await.unwrap(), PeriodSummary::EMPTY);

    ledger
        .create_transaction(TransactionInput::new(
            date(2024, 7, 14),
            9_900,
            TransactionKind::Income,
            1,
            "refund",
        ))
        .await
        .unwrap();

    let summary = ledger.summary(day).await.unwrap();
    assert_eq!(summary.income, Amount::new(9_900));
    assert_eq!(summary.count, 1);
}

#[tokio::test]
async fn deleting_unknown_id_is_not_found_and_keeps_cache() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let cached = ledger.summary(march()).await.unwrap();

    let err = ledger
        .delete_transaction(&TransactionId::from("missing"), date(2024, 3, 5))
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::NotFound(TransactionId::from("missing")));
    assert_eq!(ledger.cached_summary(&march()), Some(cached));
    assert_eq!(ledger.summary(march()).await.unwrap(), cached);
    assert_eq!(ledger.api().list_calls(), 1);
}

#[tokio::test]
async fn deleting_twice_reports_not_found_the_second_time() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let id = TransactionId::from("groceries");

    ledger.delete_transaction(&id, date(2024, 3, 5)).await.unwrap();
    let summary = ledger.summary(march()).await.unwrap();
    assert_eq!(summary.expense, Amount::ZERO);

    let err = ledger.delete_transaction(&id, date(2024, 3, 5)).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
    assert_eq!(ledger.cached_summary(&march()), Some(summary));
}

#[tokio::test]
async fn invalidating_a_day_forces_month_and_year_refetch() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    ledger.year_summary(2024).await.unwrap();
    assert_eq!(ledger.api().list_calls(), 12);

    ledger.invalidate(&PeriodKey::day(date(2024, 3, 5)));
    assert!(ledger.cached_summary(&march()).is_none());
    assert!(ledger.cached_summary(&PeriodKey::year(2024)).is_none());
    assert!(ledger.cached_summary(&PeriodKey::month(2024, 4).unwrap()).is_some());

    ledger.summary(march()).await.unwrap();
    assert_eq!(ledger.api().list_calls(), 13);
    ledger.summary(PeriodKey::year(2024)).await.unwrap();
    assert_eq!(ledger.api().list_calls(), 25);
}

#[tokio::test]
async fn negative_amount_fails_before_any_request() {
    let ledger = Ledger::new(FakeApi::default());

    let err = ledger
        .create_transaction(expense_on(date(2024, 3, 5), -500))
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.api().mutation_calls(), 0);
}

#[tokio::test]
async fn rejected_mutations_leave_cache_alone() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let cached = ledger.summary(march()).await.unwrap();
    ledger.api().fail_mutations.store(true, Ordering::SeqCst);

    let err = ledger
        .create_transaction(expense_on(date(2024, 3, 5), 1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::Remote(ApiError::Validation("category does not exist".to_string()))
    );

    let err = ledger
        .delete_transaction(&TransactionId::from("salary"), date(2024, 3, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Remote(ApiError::Server(_))));

    assert_eq!(ledger.cached_summary(&march()), Some(cached));
}

#[tokio::test]
async fn failed_fetch_surfaces_error_and_keeps_cache() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let cached = ledger.summary(march()).await.unwrap();
    ledger.api().fail_list.store(true, Ordering::SeqCst);

    let err = ledger
        .summary(PeriodKey::month(2024, 4).unwrap())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::Fetch(ApiError::Server("list unavailable".to_string()))
    );
    assert!(ledger.cached_summary(&PeriodKey::month(2024, 4).unwrap()).is_none());
    assert_eq!(ledger.cached_summary(&march()), Some(cached));

    // A failure is not remembered: the next read tries again.
    ledger.api().fail_list.store(false, Ordering::SeqCst);
    ledger.summary(PeriodKey::month(2024, 4).unwrap()).await.unwrap();
}

#[tokio::test]
async fn failed_month_fails_the_whole_year() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    ledger.api().fail_list.store(true, Ordering::SeqCst);

    let err = ledger.year_summary(2024).await.unwrap_err();

    assert!(matches!(err, LedgerError::Fetch(_)));
    assert!(ledger.cached_summary(&PeriodKey::year(2024)).is_none());
}

#[tokio::test]
async fn year_with_one_failing_month_caches_nothing() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    ledger.api().fail_month.store(7, Ordering::SeqCst);

    let err = ledger.year_summary(2024).await.unwrap_err();

    assert!(matches!(err, LedgerError::Fetch(ApiError::Server(_))));
    assert_eq!(ledger.api().list_calls(), 12);
    assert!(ledger.cached_summary(&PeriodKey::year(2024)).is_none());
    for month in 1..=12 {
        let key = PeriodKey::month(2024, month).unwrap();
        assert!(ledger.cached_summary(&key).is_none(), "{key} was cached");
    }
    assert!(ledger.cached_summary(&PeriodKey::day(date(2024, 3, 5))).is_none());

    // The months that did arrive are not reused: a retry asks for all twelve.
    ledger.api().fail_month.store(0, Ordering::SeqCst);
    let year = ledger.year_summary(2024).await.unwrap();
    assert_eq!(year.total.net(), Amount::new(38_000));
    assert_eq!(ledger.api().list_calls(), 24);
    assert_eq!(ledger.cached_summary(&PeriodKey::year(2024)), Some(year.total));
    assert!(ledger.cached_summary(&march()).is_some());
}

#[tokio::test]
async fn update_invalidates_old_and_new_months() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    let april = PeriodKey::month(2024, 4).unwrap();
    ledger.summary(march()).await.unwrap();
    ledger.summary(april).await.unwrap();

    let moved = ledger
        .update_transaction(
            &TransactionId::from("groceries"),
            date(2024, 3, 5),
            expense_on(date(2024, 4, 2), 12_000),
        )
        .await
        .unwrap();
    assert_eq!(moved.date, date(2024, 4, 2));
    assert!(ledger.cached_summary(&march()).is_none());
    assert!(ledger.cached_summary(&april).is_none());

    assert_eq!(ledger.summary(march()).await.unwrap().expense, Amount::ZERO);
    assert_eq!(
        ledger.summary(april).await.unwrap().expense,
        Amount::new(12_000)
    );
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let ledger = Ledger::new(FakeApi::default());

    let err = ledger
        .update_transaction(
            &TransactionId::from("ghost"),
            date(2024, 3, 5),
            expense_on(date(2024, 3, 5), 1),
        )
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::NotFound(TransactionId::from("ghost")));
}

#[tokio::test]
async fn refresh_drops_cache_without_refetching() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));
    ledger.summary(march()).await.unwrap();

    ledger.refresh();

    assert!(ledger.cached_summary(&march()).is_none());
    assert_eq!(ledger.api().list_calls(), 1);
    ledger.summary(march()).await.unwrap();
    assert_eq!(ledger.api().list_calls(), 2);
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let mut records = march_fifth();
    records.push(record("early", date(2024, 3, 1), 1, TransactionKind::Saving));
    records.push(record("late", date(2024, 3, 30), 2, TransactionKind::Expense));
    let ledger = Ledger::new(FakeApi::with(records));

    let listed = ledger.transactions(2024, 3).await.unwrap();

    let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids[0], "late");
    assert_eq!(ids[3], "early");
    assert_eq!(listed.len(), 4);
}

#[tokio::test]
async fn invalid_month_is_rejected_locally() {
    let ledger = Ledger::new(FakeApi::default());

    assert!(matches!(
        ledger.transactions(2024, 13).await,
        Err(LedgerError::Validation(_))
    ));
    assert_eq!(ledger.api().list_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_reads_of_one_month_share_a_fetch() {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = Ledger::new(FakeApi::gated(march_fifth(), Arc::clone(&gate)));

    let month = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    let day = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(PeriodKey::day(date(2024, 3, 5))).await }
    });

    wait_for_list_calls(ledger.api(), 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    gate.add_permits(1);

    let month = month.await.unwrap().unwrap();
    let day = day.await.unwrap().unwrap();
    assert_eq!(month.net(), Amount::new(38_000));
    assert_eq!(day, month);
    assert_eq!(ledger.api().list_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_waiters_share_a_failure() {
    let gate = Arc::new(Semaphore::new(0));
    let api = FakeApi::gated(march_fifth(), Arc::clone(&gate));
    api.fail_list.store(true, Ordering::SeqCst);
    let ledger = Ledger::new(api);

    let first = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    let second = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });

    wait_for_list_calls(ledger.api(), 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    gate.add_permits(1);

    assert!(matches!(first.await.unwrap(), Err(LedgerError::Fetch(_))));
    assert!(matches!(second.await.unwrap(), Err(LedgerError::Fetch(_))));
    assert_eq!(ledger.api().list_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abandoned_fetch_commits_nothing() {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = Ledger::new(FakeApi::gated(march_fifth(), Arc::clone(&gate)));

    let abandoned = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    wait_for_list_calls(ledger.api(), 1).await;
    abandoned.abort();
    assert!(abandoned.await.unwrap_err().is_cancelled());

    assert!(ledger.cached_summary(&march()).is_none());
    assert!(ledger.cached_summary(&PeriodKey::day(date(2024, 3, 5))).is_none());

    gate.add_permits(1);
    let summary = ledger.summary(march()).await.unwrap();
    assert_eq!(summary.net(), Amount::new(38_000));
    assert_eq!(ledger.api().list_calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remaining_waiter_takes_over_an_abandoned_fetch() {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = Ledger::new(FakeApi::gated(march_fifth(), Arc::clone(&gate)));

    let leader = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    wait_for_list_calls(ledger.api(), 1).await;
    let follower = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    leader.abort();
    gate.add_permits(1);

    let summary = follower.await.unwrap().unwrap();
    assert_eq!(summary.net(), Amount::new(38_000));
    assert_eq!(ledger.cached_summary(&march()), Some(summary));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetch_overtaken_by_mutation_is_not_committed() {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = Ledger::new(FakeApi::gated(march_fifth(), Arc::clone(&gate)));

    let stale_read = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    wait_for_list_calls(ledger.api(), 1).await;

    ledger
        .create_transaction(expense_on(date(2024, 3, 9), 8_000))
        .await
        .unwrap();
    gate.add_permits(1);

    // The in-flight read started before the create and may report old totals,
    // but it must not land in the cache.
    let stale = stale_read.await.unwrap().unwrap();
    assert_eq!(stale.expense, Amount::new(12_000));
    assert!(ledger.cached_summary(&march()).is_none());

    let fresh = ledger.summary(march()).await.unwrap();
    assert_eq!(fresh.expense, Amount::new(20_000));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_readers_fetch_a_month_once() {
    let ledger = Ledger::new(FakeApi::with(march_fifth()));

    let readers: Vec<_> = (0..48)
        .map(|i| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                match i % 3 {
                    0 => ledger.summary(march()).await,
                    1 => ledger.summary(PeriodKey::day(date(2024, 3, 5))).await,
                    _ => ledger.daily_summaries(2024, 3).await.map(|month| month.total),
                }
            })
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.await.unwrap().unwrap().net(), Amount::new(38_000));
    }

    assert_eq!(ledger.api().list_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn mutation_in_another_month_does_not_block_a_commit() {
    let gate = Arc::new(Semaphore::new(0));
    let ledger = Ledger::new(FakeApi::gated(march_fifth(), Arc::clone(&gate)));

    let read = tokio::spawn({
        let ledger = ledger.clone();
        async move { ledger.summary(march()).await }
    });
    wait_for_list_calls(ledger.api(), 1).await;

    ledger
        .create_transaction(expense_on(date(2024, 6, 1), 4_000))
        .await
        .unwrap();
    gate.add_permits(1);

    let summary = read.await.unwrap().unwrap();
    assert_eq!(summary.net(), Amount::new(38_000));
    assert_eq!(ledger.cached_summary(&march()), Some(summary));
    assert!(ledger.cached_summary(&PeriodKey::day(date(2024, 3, 5))).is_some());
}
