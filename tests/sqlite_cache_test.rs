// ABOUTME: Integration tests for the SQLite-backed persistent detail cache
// ABOUTME: Tests version tagging, stale entry inspection, file persistence, and fail-open reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{at, completed, day, detail, fetch_settings, harness, init_test_logging, lift, Harness};
use liftlog::cache::sqlite::SqliteDetailCache;
use liftlog::cache::{CacheLookup, DetailCache};
use liftlog::mapping::StaticMappingProvider;
use liftlog::models::{SessionId, SessionRecord};
use liftlog::providers::SyntheticSessionSource;
use std::sync::Arc;
use tempfile::tempdir;

const MEMORY_URL: &str = "sqlite::memory:";

fn squat_record(session: &str) -> SessionRecord {
    SessionRecord {
        session_id: SessionId::new(session),
        date: day(6, 3),
        finish_timestamp: Some(at(day(6, 3), 19)),
        volume_kg: 2400.5,
        max_weight_kg: 82.5,
        exercise_name: "Back Squat".to_owned(),
    }
}

#[tokio::test]
async fn test_put_then_get_returns_same_records() {
    init_test_logging();
    let cache = SqliteDetailCache::connect(MEMORY_URL, 2).await.unwrap();
    let session = SessionId::new("4411");
    let records = vec![squat_record("4411")];

    assert!(matches!(cache.get("u1", &session).await, CacheLookup::Miss));
    cache.put("u1", &session, &records).await.unwrap();

    assert_eq!(cache.get("u1", &session).await.into_hit(), Some(records));
    assert!(matches!(cache.get("u2", &session).await, CacheLookup::Miss));
}

#[tokio::test]
async fn test_empty_record_list_is_a_hit() {
    init_test_logging();
    let cache = SqliteDetailCache::connect(MEMORY_URL, 2).await.unwrap();
    let session = SessionId::new("77");

    cache.put("u1", &session, &[]).await.unwrap();

    assert_eq!(cache.get("u1", &session).await.into_hit(), Some(Vec::new()));
}

#[tokio::test]
async fn test_stale_entries_miss_but_remain_inspectable() {
    init_test_logging();
    let old = SqliteDetailCache::connect(MEMORY_URL, 1).await.unwrap();
    let session = SessionId::new("4411");
    old.put("u1", &session, &[squat_record("4411")]).await.unwrap();

    let current = old.with_version(2);
    assert_eq!(current.current_version(), 2);
    assert!(matches!(current.get("u1", &session).await, CacheLookup::Miss));

    let stored = current.inspect("u1", &session).await.unwrap().unwrap();
    assert_eq!(stored.cache_version, 1);
    assert!(!stored.is_current(2));

    current.put("u1", &session, &[]).await.unwrap();
    let stored = current.inspect("u1", &session).await.unwrap().unwrap();
    assert_eq!(stored.cache_version, 2);
    assert!(stored.records.is_empty());
}

#[tokio::test]
async fn test_entries_survive_reconnect() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("details.db").display());
    let session = SessionId::new("5150");

    {
        let cache = SqliteDetailCache::connect(&url, 2).await.unwrap();
        cache.put("u1", &session, &[squat_record("5150")]).await.unwrap();
        cache.pool().close().await;
    }

    let reopened = SqliteDetailCache::connect(&url, 2).await.unwrap();
    let records = reopened.get("u1", &session).await.into_hit().unwrap();
    assert_eq!(records, vec![squat_record("5150")]);
}

#[tokio::test]
async fn test_corrupt_row_reads_as_error() {
    init_test_logging();
    let cache = SqliteDetailCache::connect(MEMORY_URL, 2).await.unwrap();
    sqlx::query(
        "INSERT INTO session_details (user_id, session_id, cache_version, records_json, stored_at)
         VALUES ('u1', '13', 2, 'not json', '2024-06-01T00:00:00Z')",
    )
    .execute(cache.pool())
    .await
    .unwrap();

    assert!(matches!(
        cache.get("u1", &SessionId::new("13")).await,
        CacheLookup::Error(_)
    ));
}

#[tokio::test]
async fn test_service_refetches_after_version_change_and_repairs_corrupt_rows() {
    let cache = SqliteDetailCache::connect(MEMORY_URL, 2).await.unwrap();
    sqlx::query(
        "INSERT INTO session_details (user_id, session_id, cache_version, records_json, stored_at)
         VALUES ('u1', '2', 2, '{broken', '2024-06-01T00:00:00Z')",
    )
    .execute(cache.pool())
    .await
    .unwrap();

    let source = || {
        SyntheticSessionSource::new()
            .with_session(completed(1, day(6, 3)), detail(vec![lift("Back Squat", 80.0, 5, 5)]))
            .with_session(completed(2, day(6, 5)), detail(vec![lift("Pull Up", 10.0, 8, 3)]))
    };

    let Harness { source: first, service } = harness(
        source(),
        Arc::new(cache.clone()),
        Arc::new(StaticMappingProvider::default()),
        &fetch_settings(2),
        at(day(6, 6), 9),
    );
    let report = service.get_exercise_history("u1", 96.0).await.unwrap();
    assert_eq!(first.detail_calls(), 2, "corrupt row must be treated as a miss");
    assert_eq!(report.exercises.len(), 2);
    assert!(cache.get("u1", &SessionId::new("2")).await.into_hit().is_some());

    let Harness { source: second, service } = harness(
        source(),
        Arc::new(cache.with_version(3)),
        Arc::new(StaticMappingProvider::default()),
        &fetch_settings(2),
        at(day(6, 6), 9),
    );
    service.get_exercise_history("u1", 96.0).await.unwrap();
    assert_eq!(second.detail_calls(), 2);

    let stored = cache.inspect("u1", &SessionId::new("1")).await.unwrap().unwrap();
    assert_eq!(stored.cache_version, 3);
}
