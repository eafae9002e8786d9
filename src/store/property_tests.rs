//! Property-Based Tests for the Store Module
//!
//! Uses proptest to verify the eviction size bound and ordering guarantees
//! over arbitrary store contents.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http::header::{CONTENT_LENGTH, DATE};
use http::{HeaderMap, HeaderValue, StatusCode};
use proptest::prelude::*;
use tokio::sync::RwLock;

use crate::store::{trim, CacheStore, EvictionPolicy, SharedStore, StoredResponse};

// == Test Configuration ==
const TEST_MAX_BYTES: u64 = 16 * 1024;
const TEST_TARGET_BYTES: u64 = 8 * 1024;

// == Helpers ==
/// Entry with size and age carried in headers only.
fn dated_entry(size: u64, unix_secs: i64) -> StoredResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_LENGTH,
        HeaderValue::from_str(&size.to_string()).unwrap(),
    );
    let date = Utc.timestamp_opt(unix_secs, 0).unwrap().to_rfc2822();
    headers.insert(DATE, HeaderValue::from_str(&date).unwrap());
    StoredResponse::new(StatusCode::OK, headers, Bytes::new())
}

fn populated_store(sizes: &[u64]) -> SharedStore {
    let mut store = CacheStore::new("image-v2");
    for (i, size) in sizes.iter().enumerate() {
        // Distinct second-granularity timestamps, oldest first.
        store.put(format!("k{i:04}"), dated_entry(*size, (i as i64 + 1) * 60));
    }
    Arc::new(RwLock::new(store))
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime")
        .block_on(future)
}

// == Strategies ==
/// Entry sizes that keep totals in the neighborhood of the test limits.
fn entry_sizes_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..4096, 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any store contents over the ceiling, a completed trim leaves the
    // reported total at or below the target, or the store empty. A store
    // within the ceiling is left untouched.
    #[test]
    fn prop_trim_respects_size_bound(sizes in entry_sizes_strategy()) {
        let store = populated_store(&sizes);
        let policy = EvictionPolicy::new(TEST_MAX_BYTES, TEST_TARGET_BYTES);
        let before: u64 = sizes.iter().sum();

        run(trim(&store, policy));

        let after = run(async { store.read().await.total_reported_bytes() });
        let len = run(async { store.read().await.len() });
        if before > TEST_MAX_BYTES {
            prop_assert!(
                after <= TEST_TARGET_BYTES || len == 0,
                "trimmed store still holds {after} bytes across {len} entries"
            );
        } else {
            prop_assert_eq!(after, before, "under-budget store must not be touched");
            prop_assert_eq!(len, sizes.len());
        }
    }

    // For entries with distinct timestamps, every deleted entry is older
    // than every surviving one: eviction never skips ahead.
    #[test]
    fn prop_trim_deletes_oldest_first(sizes in entry_sizes_strategy()) {
        let store = populated_store(&sizes);
        let policy = EvictionPolicy::new(TEST_MAX_BYTES, TEST_TARGET_BYTES);

        run(trim(&store, policy));

        let surviving: Vec<i64> = run(async {
            store
                .read()
                .await
                .iter()
                .map(|(_, response)| response.stored_at_ms())
                .collect()
        });
        if let Some(oldest_survivor) = surviving.iter().min() {
            let survivors = surviving.len();
            let deleted = sizes.len() - survivors;
            // Keys were written oldest-first, so the deleted set must be
            // exactly the `deleted` oldest timestamps.
            let expected_oldest = (deleted as i64 + 1) * 60 * 1000;
            prop_assert_eq!(*oldest_survivor, expected_oldest);
        }
    }

    // Trimming twice with the same policy is idempotent.
    #[test]
    fn prop_trim_idempotent(sizes in entry_sizes_strategy()) {
        let store = populated_store(&sizes);
        let policy = EvictionPolicy::new(TEST_MAX_BYTES, TEST_TARGET_BYTES);

        run(trim(&store, policy));
        let first: Vec<String> = {
            let mut keys = run(async { store.read().await.keys() });
            keys.sort();
            keys
        };
        run(trim(&store, policy));
        let second: Vec<String> = {
            let mut keys = run(async { store.read().await.keys() });
            keys.sort();
            keys
        };

        prop_assert_eq!(first, second);
    }
}
