use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};

use carelens_server::sessions::{SessionStore, is_valid_session_id, spawn_sweeper};

fn at(secs: i64) -> Timestamp {
    Timestamp::from_second(1_700_000_000 + secs).unwrap()
}

#[test]
fn same_id_returns_same_context() {
    let store = SessionStore::new(5, 10, Duration::from_secs(60));
    let a = store.acquire("abc");
    let b = store.acquire("abc");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn contexts_use_configured_window() {
    let store = SessionStore::new(3, 10, Duration::from_secs(60));
    let ctx = store.acquire("abc");
    let mut ctx = ctx.lock().await;
    for i in 0..10 {
        ctx.add_message(format!("q{i}"), format!("a{i}"));
    }
    assert_eq!(ctx.window_size(), 3);
    assert_eq!(ctx.len(), 3);
}

#[test]
fn full_store_evicts_least_recently_used() {
    let store = SessionStore::new(5, 2, Duration::from_secs(3600));
    store.acquire_at("old", at(0));
    store.acquire_at("newer", at(10));
    // Touching "old" makes "newer" the least recently used.
    store.acquire_at("old", at(20));
    store.acquire_at("newest", at(30));

    assert_eq!(store.len(), 2);
    assert!(store.contains("old"));
    assert!(store.contains("newest"));
    assert!(!store.contains("newer"));
}

#[test]
fn idle_sessions_are_evicted() {
    let store = SessionStore::new(5, 10, Duration::from_secs(60));
    store.acquire_at("stale", at(0));
    store.acquire_at("fresh", at(100));

    let evicted = store.evict_idle_at(at(100) + SignedDuration::from_secs(30));
    assert_eq!(evicted, 1);
    assert!(!store.contains("stale"));
    assert!(store.contains("fresh"));
}

#[test]
fn remove_reports_whether_session_existed() {
    let store = SessionStore::new(5, 10, Duration::from_secs(60));
    store.acquire("abc");
    assert!(store.remove("abc"));
    assert!(!store.remove("abc"));
    assert!(store.is_empty());
}

#[test]
fn session_id_rules() {
    assert!(is_valid_session_id("3f2b6c1e-7d1a-4c1e-9a4b-2f0e8d7c6b5a"));
    assert!(is_valid_session_id("user_42"));
    assert!(!is_valid_session_id(""));
    assert!(!is_valid_session_id("has space"));
    assert!(!is_valid_session_id("../etc"));
    assert!(!is_valid_session_id(&"x".repeat(129)));
}

#[tokio::test]
async fn sweeper_runs_until_aborted() {
    let store = Arc::new(SessionStore::new(5, 10, Duration::from_secs(60)));
    let handle = spawn_sweeper(Arc::clone(&store), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!handle.is_finished());
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn full_store_keeps_session_with_turn_in_flight() {
    let store = SessionStore::new(5, 1, Duration::from_secs(1800));
    let alice = store.acquire_at("alice", at(0));
    let _turn = alice.lock().await;

    store.acquire_at("bob", at(10));

    assert!(store.contains("alice"));
    assert_eq!(store.len(), 2);
    let again = store.acquire_at("alice", at(20));
    assert!(Arc::ptr_eq(&alice, &again));
    assert!(again.try_lock().is_err());
}

#[test]
fn full_store_evicts_oldest_idle_session_over_busy_one() {
    let store = SessionStore::new(5, 2, Duration::from_secs(3600));
    let busy = store.acquire_at("busy", at(0));
    store.acquire_at("idle", at(10));
    store.acquire_at("new", at(20));

    assert!(store.contains("busy"));
    assert!(!store.contains("idle"));
    assert!(store.contains("new"));
    drop(busy);
}

#[test]
fn idle_sweep_skips_sessions_still_held() {
    let store = SessionStore::new(5, 10, Duration::from_secs(60));
    let held = store.acquire_at("held", at(0));
    store.acquire_at("stale", at(0));

    let evicted = store.evict_idle_at(at(0) + SignedDuration::from_secs(600));
    assert_eq!(evicted, 1);
    assert!(store.contains("held"));
    assert!(!store.contains("stale"));

    drop(held);
    assert_eq!(store.evict_idle_at(at(0) + SignedDuration::from_secs(600)), 1);
    assert!(store.is_empty());
}
