//! Integration tests for OutboxStore.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use hively_events::{AppendEvent, OutboxStore};
use serde_json::json;
use sqlx::PgPool;

/// Get a migrated test store, or skip if no test DB is available.
async fn test_store() -> Option<(PgPool, OutboxStore)> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    let store = OutboxStore::new(pool.clone());
    store.migrate().await.ok()?;

    // Clean slate for each test
    sqlx::query("TRUNCATE outbox_events RESTART IDENTITY")
        .execute(&pool)
        .await
        .ok()?;
    sqlx::query("DELETE FROM outbox_cursors")
        .execute(&pool)
        .await
        .ok()?;

    Some((pool, store))
}

#[tokio::test]
async fn append_assigns_increasing_seqs() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    let first = store
        .append(AppendEvent::new("user_saved", json!({"n": 1})))
        .await
        .unwrap();
    let second = store
        .append(AppendEvent::new("user_saved", json!({"n": 2})))
        .await
        .unwrap();

    assert!(first > 0);
    assert!(second > first);
}

#[tokio::test]
async fn read_from_returns_events_in_order() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    store
        .append(AppendEvent::new("event_a", json!({"n": 1})))
        .await
        .unwrap();
    store
        .append(AppendEvent::new("event_b", json!({"n": 2})))
        .await
        .unwrap();
    store
        .append(AppendEvent::new("event_c", json!({"n": 3})))
        .await
        .unwrap();

    let events = store.read_from(1, 100).await.unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].event_type, "event_a");
    assert_eq!(events[1].event_type, "event_b");
    assert_eq!(events[2].event_type, "event_c");
    assert_eq!(events[1].payload["n"], 2);

    // Resuming mid-stream yields only the tail.
    let tail = store.read_from(3, 100).await.unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].event_type, "event_c");
}

#[tokio::test]
async fn read_from_respects_limit() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    for n in 0..5 {
        store
            .append(AppendEvent::new("e", json!({"n": n})))
            .await
            .unwrap();
    }

    let events = store.read_from(1, 2).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].seq, 1);
    assert_eq!(events[1].seq, 2);
}

#[tokio::test]
async fn read_from_stops_at_a_sequence_hole() {
    let Some((pool, store)) = test_store().await else {
        return;
    };

    store.append(AppendEvent::new("a", json!({}))).await.unwrap();
    store.append(AppendEvent::new("b", json!({}))).await.unwrap();
    store.append(AppendEvent::new("c", json!({}))).await.unwrap();

    // A deleted row stands in for an uncommitted transaction's hole.
    sqlx::query("DELETE FROM outbox_events WHERE seq = 2")
        .execute(&pool)
        .await
        .unwrap();

    let events = store.read_from(1, 100).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].seq, 1);
}

#[tokio::test]
async fn read_from_hole_at_start_returns_empty() {
    let Some((pool, store)) = test_store().await else {
        return;
    };

    store.append(AppendEvent::new("a", json!({}))).await.unwrap();
    store.append(AppendEvent::new("b", json!({}))).await.unwrap();

    sqlx::query("DELETE FROM outbox_events WHERE seq = 1")
        .execute(&pool)
        .await
        .unwrap();

    // The reader expects seq=1 first but finds seq=2.
    let events = store.read_from(1, 100).await.unwrap();
    assert!(
        events.is_empty(),
        "hole at start should return empty, got {} events",
        events.len()
    );
}

#[tokio::test]
async fn cursor_defaults_to_one_for_unknown_consumers() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    assert_eq!(store.cursor("never_seen").await.unwrap(), 1);
}

#[tokio::test]
async fn set_cursor_upserts_and_reads_back() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    store.set_cursor("graph_projector", 7).await.unwrap();
    assert_eq!(store.cursor("graph_projector").await.unwrap(), 7);

    // Advancing overwrites, it does not insert a second row.
    store.set_cursor("graph_projector", 42).await.unwrap();
    assert_eq!(store.cursor("graph_projector").await.unwrap(), 42);

    // Other consumers are unaffected.
    assert_eq!(store.cursor("other_consumer").await.unwrap(), 1);
}

#[tokio::test]
async fn migrate_is_idempotent() {
    let Some((_pool, store)) = test_store().await else {
        return;
    };

    store.migrate().await.unwrap();
    store.migrate().await.unwrap();

    store
        .append(AppendEvent::new("still_works", json!({})))
        .await
        .unwrap();
    let events = store.read_from(1, 10).await.unwrap();
    assert_eq!(events.len(), 1);
}
