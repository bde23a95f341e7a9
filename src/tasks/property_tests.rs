//! Property-Based Tests for the Expiry Sweep
//!
//! Uses proptest over arbitrary store contents and reference dates.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::store::{format_date, MemoryStore, PerishableRecord, RecordId};
use crate::tasks::run_expiry_sweep;

// == Strategies ==
/// Days from 2000-01-01 spanning roughly sixty years.
fn day_offset_strategy() -> impl Strategy<Value = i64> {
    0i64..22_000
}

fn date_from_offset(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
}

/// Expiry values: mostly valid dates, some garbage.
fn expiry_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => day_offset_strategy().prop_map(|d| format_date(date_from_offset(d))),
        1 => "[a-z ]{0,12}",
    ]
}

fn records_strategy() -> impl Strategy<Value = Vec<PerishableRecord>> {
    prop::collection::btree_map("[a-z0-9]{1,8}", expiry_strategy(), 0..40).prop_map(|map| {
        map.into_iter()
            .map(|(id, expiry)| PerishableRecord::new(id, expiry))
            .collect()
    })
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Running the sweep twice with the same date leaves the store as one run
    // did, and the second run removes nothing.
    #[test]
    fn prop_sweep_is_idempotent(records in records_strategy(), today in day_offset_strategy()) {
        let today = date_from_offset(today);
        let store = MemoryStore::with_records(records);

        let (first, after_first, second, after_second) = block_on(async {
            let first = run_expiry_sweep(&store, today).await;
            let after_first = store.ids().await;
            let second = run_expiry_sweep(&store, today).await;
            let after_second = store.ids().await;
            (first, after_first, second, after_second)
        });

        prop_assert!(!first.is_skipped());
        prop_assert_eq!(second.removed_count, 0);
        prop_assert!(second.removed_ids.is_empty());
        prop_assert_eq!(after_first, after_second);
    }

    // Removed and kept records partition the original set, and the predicate
    // is exactly `expiry < today` with malformed dates never removed.
    #[test]
    fn prop_sweep_partitions_by_cutoff(records in records_strategy(), today in day_offset_strategy()) {
        let today = date_from_offset(today);
        let expected_removed: BTreeSet<RecordId> = records
            .iter()
            .filter(|r| matches!(r.expiry(), Ok(d) if d < today))
            .map(|r| r.id.clone())
            .collect();
        let all: BTreeSet<RecordId> = records.iter().map(|r| r.id.clone()).collect();
        let store = MemoryStore::with_records(records);

        let (result, remaining) = block_on(async {
            let result = run_expiry_sweep(&store, today).await;
            (result, store.ids().await)
        });

        let removed: BTreeSet<RecordId> = result.removed_ids.iter().cloned().collect();
        let remaining: BTreeSet<RecordId> = remaining.into_iter().collect();

        prop_assert_eq!(result.removed_count, removed.len());
        prop_assert_eq!(&removed, &expected_removed);
        prop_assert!(removed.is_disjoint(&remaining));
        prop_assert_eq!(removed.union(&remaining).cloned().collect::<BTreeSet<_>>(), all);
    }

    // A record expiring on the reference date survives; one expiring the day
    // before does not.
    #[test]
    fn prop_boundary_day(today in 1i64..22_000) {
        let today = date_from_offset(today);
        let store = MemoryStore::with_records([
            PerishableRecord::new("on_cutoff", format_date(today)),
            PerishableRecord::new("day_before", format_date(today - Duration::days(1))),
        ]);

        let (result, remaining) = block_on(async {
            let result = run_expiry_sweep(&store, today).await;
            (result, store.ids().await)
        });

        prop_assert_eq!(result.removed_ids, vec![RecordId::from("day_before")]);
        prop_assert_eq!(remaining, vec![RecordId::from("on_cutoff")]);
    }
}
