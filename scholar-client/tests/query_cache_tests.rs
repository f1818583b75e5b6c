//! Query cache behaviour under concurrency: shared fetches, superseded
//! results and prefix invalidation.

use proptest::prelude::*;
use scholar_client::{ApiClientError, ErrorKind, QueryCache, QueryKey, QueryState, QueryStatus};
use scholar_test_utils::generators::arb_query_key;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

#[tokio::test]
async fn concurrent_reads_share_one_fetch() {
    let cache = QueryCache::new();
    let key = QueryKey::new("students").with_filters([("yearGroupId", "Y7")]);
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = oneshot::channel::<Vec<u32>>();

    let counted = Arc::clone(&calls);
    let first: QueryState<Vec<u32>> = cache.read(&key, move || {
        counted.fetch_add(1, Ordering::SeqCst);
        async move { rx.await.map_err(|_| ApiClientError::Unsupported("closed")) }
    });
    assert_eq!(first.status, QueryStatus::Loading);

    for _ in 0..5 {
        let counted = Arc::clone(&calls);
        let again: QueryState<Vec<u32>> = cache.read(&key, move || {
            counted.fetch_add(1, Ordering::SeqCst);
            async { Ok(Vec::new()) }
        });
        assert!(again.is_loading());
    }

    tx.send(vec![1, 2, 3]).unwrap();
    let settled: QueryState<Vec<u32>> = cache.settled(&key).await;
    assert_eq!(settled.data(), Some(&vec![1, 2, 3]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn superseded_result_never_overwrites_newer_one() {
    let cache = QueryCache::new();
    let key = QueryKey::new("classes");

    let (old_tx, old_rx) = oneshot::channel::<u32>();
    let (old_done_tx, old_done_rx) = oneshot::channel::<()>();
    let _: QueryState<u32> = cache.read(&key, move || async move {
        let value = old_rx.await.unwrap_or_default();
        let _ = old_done_tx.send(());
        Ok(value)
    });

    let (new_tx, new_rx) = oneshot::channel::<u32>();
    let _: QueryState<u32> = cache.refetch(&key, move || async move {
        Ok(new_rx.await.unwrap_or_default())
    });

    new_tx.send(2).unwrap();
    let state: QueryState<u32> = cache.settled(&key).await;
    assert_eq!(state.data(), Some(&2));

    old_tx.send(1).unwrap();
    old_done_rx.await.unwrap();
    tokio::task::yield_now().await;

    let state: QueryState<u32> = cache.peek(&key);
    assert_eq!(state.data(), Some(&2));
    assert_eq!(state.status, QueryStatus::Success);
}

#[tokio::test]
async fn result_landing_after_clear_is_dropped() {
    let cache = QueryCache::new();
    let key = QueryKey::new("dashboard").path("overview");
    let (tx, rx) = oneshot::channel::<u32>();
    let (done_tx, done_rx) = oneshot::channel::<()>();
    let _: QueryState<u32> = cache.read(&key, move || async move {
        let value = rx.await.unwrap_or_default();
        let _ = done_tx.send(());
        Ok(value)
    });

    cache.clear();
    tx.send(9).unwrap();
    done_rx.await.unwrap();
    tokio::task::yield_now().await;

    assert!(!cache.contains(&key));
}

#[tokio::test]
async fn invalidation_keeps_data_and_refetches_on_next_read() {
    let cache = QueryCache::new();
    let filtered = QueryKey::new("students").with_filters([("yearGroupId", "Y7")]);
    let other = QueryKey::new("students-archive");
    cache.fetch(&filtered, || async { Ok(vec!["Ada"]) }).await;
    cache.fetch(&other, || async { Ok(vec!["Old"]) }).await;

    assert_eq!(cache.invalidate(&QueryKey::new("students")), 1);
    assert_eq!(cache.invalidate(&QueryKey::new("students")), 0);
    assert!(cache.is_stale(&filtered));
    assert!(!cache.is_stale(&other));

    let stale: QueryState<Vec<&str>> = cache.peek(&filtered);
    assert_eq!(stale.data(), Some(&vec!["Ada"]));

    let reloading: QueryState<Vec<&str>> = cache.read(&filtered, || async { Ok(vec!["Ada", "Bob"]) });
    assert_eq!(reloading.status, QueryStatus::Loading);
    assert_eq!(reloading.last_data(), Some(&vec!["Ada"]));

    let fresh: QueryState<Vec<&str>> = cache.settled(&filtered).await;
    assert_eq!(fresh.data(), Some(&vec!["Ada", "Bob"]));
    assert!(!fresh.stale);
}

#[tokio::test]
async fn failed_fetch_is_retryable_through_refetch() {
    let cache = QueryCache::new();
    let key = QueryKey::new("reports");
    let failed: QueryState<Vec<u8>> = cache
        .fetch(&key, || async {
            Err(ApiClientError::Server {
                status: 503,
                message: Some("maintenance".into()),
            })
        })
        .await;
    let error = failed.error.clone().unwrap();
    assert_eq!(error.kind, ErrorKind::Server);
    assert!(error.retryable());

    // A plain read does not retry an errored entry on its own.
    let still: QueryState<Vec<u8>> = cache.read(&key, || async { Ok(vec![1]) });
    assert!(still.is_error());

    let _: QueryState<Vec<u8>> = cache.refetch(&key, || async { Ok(vec![1]) });
    let recovered: QueryState<Vec<u8>> = cache.settled(&key).await;
    assert_eq!(recovered.data(), Some(&vec![1]));
}

#[tokio::test]
async fn subscribers_see_settles_and_invalidations() {
    let cache = QueryCache::new();
    let mut rx = cache.subscribe();
    let key = QueryKey::new("notes");
    cache.fetch(&key, || async { Ok(0u8) }).await;
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    cache.invalidate(&QueryKey::new("notes"));
    assert!(rx.has_changed().unwrap());
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn invalidate_marks_exactly_the_prefixed_keys(
        keys in prop::collection::vec(arb_query_key(), 1..12),
        prefix in arb_query_key(),
    ) {
        let rt = runtime();
        let cache = QueryCache::new();
        rt.block_on(async {
            for key in &keys {
                cache.fetch(key, || async { Ok(()) }).await;
            }
        });

        let expected = cache.keys().iter().filter(|k| k.starts_with(&prefix)).count();
        prop_assert_eq!(cache.invalidate(&prefix), expected);
        for key in cache.keys() {
            prop_assert_eq!(cache.is_stale(&key), key.starts_with(&prefix));
        }
        prop_assert_eq!(cache.invalidate(&prefix), 0);
    }

    #[test]
    fn filter_order_never_changes_the_key(
        pairs in prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{1,6}", 0..5),
    ) {
        let forward: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let mut backward = forward.clone();
        backward.reverse();
        let a = QueryKey::new("students").with_filters(forward);
        let b = QueryKey::new("students").with_filters(backward);
        prop_assert_eq!(a, b);
    }
}
