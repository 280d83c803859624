//! Integration Tests for memoized operations
//!
//! Exercises the wrappers end to end against real cache stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use memo_cache::cache::MEMOIZE_CACHE;
use memo_cache::clock::ManualClock;
use memo_cache::memoize::type_owner;
use memo_cache::storage::{DurableStore, ProviderSet};
use memo_cache::{ttl, CacheError, MemoContext, MemoSettings, MemoizeOptions, Provider};
use serde::{Deserialize, Serialize};

// == Helper Functions ==

fn manual_context(providers: ProviderSet) -> (MemoContext, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let ctx = MemoContext::new(providers, MemoSettings::default(), clock.clone());
    (ctx, clock)
}

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    (calls.clone(), calls)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
}

struct UserRepo;

// == TTL Tests ==

#[test]
fn test_hit_law_with_ttl() {
    let (ctx, clock) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let op = ctx.memoize(
        "Calc",
        "double",
        MemoizeOptions::new().ttl(Duration::from_millis(1000)),
        move |x: i64| {
            calls.fetch_add(1, Ordering::SeqCst);
            x * 2
        },
    );

    clock.set(10_000);
    assert_eq!(op.call(3).unwrap(), 6);

    // Just inside the TTL
    clock.set(10_999);
    assert_eq!(op.call(3).unwrap(), 6);
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    // Exactly at the TTL the entry is stale
    clock.set(11_000);
    assert_eq!(op.call(3).unwrap(), 6);
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    let entry = ctx.memo_store(Provider::Session).entries()[0].1.clone();
    assert_eq!(entry.timestamp, 11_000);
}

#[test]
fn test_zero_ttl_never_expires() {
    let (ctx, clock) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let op = ctx.memoize(
        "Calc",
        "double",
        MemoizeOptions::new().ttl(Duration::ZERO),
        move |x: i64| {
            calls.fetch_add(1, Ordering::SeqCst);
            x * 2
        },
    );

    op.call(21).unwrap();
    clock.advance(ttl::ONE_HOUR.as_millis() as u64 * 24 * 365);
    assert_eq!(op.call(21).unwrap(), 42);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sub_millisecond_ttl_still_expires() {
    let (ctx, clock) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let op = ctx.memoize(
        "Calc",
        "double",
        MemoizeOptions::new().ttl(Duration::from_micros(500)),
        move |x: i64| {
            calls.fetch_add(1, Ordering::SeqCst);
            x * 2
        },
    );

    op.call(4).unwrap();
    clock.set(1_000_000_000);
    op.call(4).unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

// == Key Tests ==

#[test]
fn test_explicit_keys_collide_only_with_themselves() {
    let (ctx, _) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let calls_b = calls.clone();

    let keyed_a = ctx.memoize("Repo", "find", MemoizeOptions::new().key("a"), move |x: u32| {
        calls.fetch_add(1, Ordering::SeqCst);
        x
    });
    let keyed_b = ctx.memoize("Repo", "find", MemoizeOptions::new().key("b"), move |x: u32| {
        calls_b.fetch_add(1, Ordering::SeqCst);
        x
    });

    // Same arguments, different keys: no collision
    assert_eq!(keyed_a.call(1).unwrap(), 1);
    assert_eq!(keyed_b.call(1).unwrap(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    // Same key, different arguments: collision
    assert_eq!(keyed_a.call(99).unwrap(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_positional_key_form() {
    let (ctx, _) = manual_context(ProviderSet::in_memory());
    let op = ctx.memoize(
        "Repo",
        "all",
        MemoizeOptions::keyed("everything", MemoizeOptions::new().ttl(ttl::FIVE_MINUTES)),
        |_: ()| vec![1, 2, 3],
    );

    op.call(()).unwrap();

    let store = ctx.memo_store(Provider::Session);
    assert!(store.get("Repo-all-everything").is_some());
}

#[test]
fn test_equal_arguments_share_an_entry() {
    let (ctx, _) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let owner = type_owner::<UserRepo>();
    let op = ctx.memoize(owner, "by_name", MemoizeOptions::new(), move |(id, name): (u32, String)| {
        calls.fetch_add(1, Ordering::SeqCst);
        User { id, name }
    });

    let first = op.call((1, "ada".to_string())).unwrap();
    let second = op.call((1, "ada".to_string())).unwrap();
    op.call((2, "ada".to_string())).unwrap();

    assert_eq!(first, second);
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    let store = ctx.memo_store(Provider::Session);
    assert_eq!(store.size(), 2);
    assert!(store
        .entries()
        .iter()
        .all(|(key, _)| key.starts_with("UserRepo-by_name-")));
}

// == Persistence Tests ==

#[test]
fn test_local_provider_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (calls, seen) = counter();

    {
        let (ctx, _) = manual_context(ProviderSet::with_local_dir(dir.path()));
        let calls = calls.clone();
        let op = ctx.memoize(
            "Users",
            "load",
            MemoizeOptions::new().provider(Provider::Local),
            move |id: u32| {
                calls.fetch_add(1, Ordering::SeqCst);
                User {
                    id,
                    name: format!("user-{}", id),
                }
            },
        );
        op.call(7).unwrap();
    }

    let (ctx, _) = manual_context(ProviderSet::with_local_dir(dir.path()));
    let op = ctx.memoize(
        "Users",
        "load",
        MemoizeOptions::new().provider(Provider::Local),
        move |id: u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            User {
                id,
                name: String::new(),
            }
        },
    );

    let user = op.call(7).unwrap();
    assert_eq!(user.name, "user-7");
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_durable_payload_roundtrip() {
    let providers = ProviderSet::in_memory();
    let (ctx, _) = manual_context(providers.clone());
    let op = ctx.memoize("Svc", "name", MemoizeOptions::new().key("k"), |_: ()| {
        "stored".to_string()
    });
    op.call(()).unwrap();

    let payload = providers
        .backend(Provider::Session)
        .read(MEMOIZE_CACHE)
        .unwrap()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(parsed[0][0], "Svc-name-k");
    assert_eq!(parsed[0][1]["value"], "stored");
}

#[test]
fn test_clear_deletes_payload() {
    let providers = ProviderSet::in_memory();
    let (ctx, _) = manual_context(providers.clone());
    let op = ctx.memoize("Svc", "id", MemoizeOptions::new(), |x: u8| x);
    op.call(1).unwrap();
    op.call(2).unwrap();

    ctx.memo_store(Provider::Session).clear().unwrap();

    assert!(providers
        .backend(Provider::Session)
        .read(MEMOIZE_CACHE)
        .unwrap()
        .is_none());
}

// == Error Tests ==

#[test]
fn test_unserializable_result_is_reported() {
    struct Opaque;
    impl Serialize for Opaque {
        fn serialize<S: serde::Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("opaque"))
        }
    }
    impl<'de> Deserialize<'de> for Opaque {
        fn deserialize<D: serde::Deserializer<'de>>(_d: D) -> Result<Self, D::Error> {
            Err(serde::de::Error::custom("opaque"))
        }
    }

    let (ctx, _) = manual_context(ProviderSet::in_memory());
    let op = ctx.memoize("Svc", "opaque", MemoizeOptions::new(), |_: ()| Opaque);

    assert!(matches!(op.call(()), Err(CacheError::Serialization(_))));
}

// == Async Tests ==

#[tokio::test]
async fn test_async_ttl_scenario() {
    let (ctx, clock) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let fetch = ctx.memoize_async(
        "Api",
        "user",
        MemoizeOptions::new().ttl(Duration::from_millis(1000)),
        move |id: u32| {
            let calls = calls.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                calls.fetch_add(1, Ordering::SeqCst);
                User {
                    id,
                    name: "remote".to_string(),
                }
            }
        },
    );

    assert_eq!(fetch.call(3).await.unwrap().id, 3);
    clock.set(500);
    assert_eq!(fetch.call(3).await.unwrap().id, 3);
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    clock.set(1500);
    assert_eq!(fetch.call(3).await.unwrap().name, "remote");
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_misses_both_compute() {
    let (ctx, _) = manual_context(ProviderSet::in_memory());
    let (calls, seen) = counter();
    let fetch = ctx.memoize_async("Api", "slow", MemoizeOptions::new(), move |x: u32| {
        let calls = calls.clone();
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            x + n as u32
        }
    });

    let (a, b) = tokio::join!(fetch.call(10), fetch.call(10));
    let (a, b) = (a.unwrap(), b.unwrap());

    // No single-flight: both calls ran, the last store wins
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    let stored = ctx.memo_store(Provider::Session).entries()[0].1.value.clone();
    assert!(stored == serde_json::json!(a) || stored == serde_json::json!(b));
    assert_eq!(ctx.memo_store(Provider::Session).size(), 1);
}

#[tokio::test]
async fn test_purge_on_notify_clears_expired_entries() {
    let (ctx, clock) = manual_context(ProviderSet::in_memory());
    let op = ctx.memoize(
        "Svc",
        "short",
        MemoizeOptions::new()
            .ttl(Duration::from_millis(100))
            .purge_on_notify(true),
        |x: u8| x,
    );
    let forever = ctx.memoize("Svc", "forever", MemoizeOptions::new(), |x: u8| x);

    op.call(1).unwrap();
    forever.call(1).unwrap();
    assert!(ctx.sweeper_installed());

    clock.set(100);
    assert_eq!(ctx.notify(), 1);

    let store = ctx.memo_store(Provider::Session);
    for _ in 0..100 {
        if store.size() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(store.size(), 1);
    assert!(store.entries()[0].0.starts_with("Svc-forever-"));
}
