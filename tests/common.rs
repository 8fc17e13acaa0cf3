// ABOUTME: Shared test utilities and fixtures for LiftLog integration tests
// ABOUTME: Provides quiet logging, training data builders, and service wiring helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `liftlog`

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use liftlog::cache::result::ResultCache;
use liftlog::cache::DetailCache;
use liftlog::config::{FetchSettings, HistorySettings};
use liftlog::history::{ExerciseHistoryService, FixedClock};
use liftlog::mapping::MappingProvider;
use liftlog::models::{ExerciseDetail, SessionStub, SetDetail, TrainingDetail};
use liftlog::providers::{SessionSource, SyntheticSessionSource};
use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Calendar date in 2024
pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// `date` at `hour`:00 UTC
pub fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .and_utc()
}

/// One exercise with `sets` identical sets of `reps` at `weight`
pub fn lift(name: &str, weight: f64, reps: u32, sets: usize) -> ExerciseDetail {
    let reps = f64::from(reps);
    ExerciseDetail {
        action_library_name: Some(name.to_owned()),
        name: None,
        finished_reps: Some(
            (0..sets)
                .map(|_| SetDetail {
                    capacity: weight * reps,
                    finished_count: reps,
                    target_count: reps,
                    weight,
                    timestamp: None,
                })
                .collect(),
        ),
    }
}

/// Training detail payload made of `exercises`
pub fn detail(exercises: Vec<ExerciseDetail>) -> TrainingDetail {
    TrainingDetail::with_exercises(exercises)
}

/// Completed session finishing at 18:00 UTC on `date`
pub fn completed(id: u64, date: NaiveDate) -> SessionStub {
    SessionStub::completed(id, date).with_finish_time(at(date, 18))
}

/// Fetch settings with a short timeout
pub fn fetch_settings(max_concurrency: usize) -> FetchSettings {
    FetchSettings {
        max_concurrency,
        fetch_timeout: Duration::from_secs(2),
        calendar_months: 13,
    }
}

/// History settings with the active-window filter disabled
pub fn history_settings() -> HistorySettings {
    HistorySettings {
        history_limit: 20,
        active_window_days: None,
        default_recovery_hours: 96.0,
    }
}

/// Everything a service test needs to observe
pub struct Harness {
    pub source: Arc<SyntheticSessionSource>,
    pub service: ExerciseHistoryService,
}

/// Service over `source` and `cache`, frozen at `now`, with a short result TTL
pub fn harness(
    source: SyntheticSessionSource,
    cache: Arc<dyn DetailCache>,
    mappings: Arc<dyn MappingProvider>,
    fetch: &FetchSettings,
    now: DateTime<Utc>,
) -> Harness {
    init_test_logging();
    let source = Arc::new(source);
    let dyn_source: Arc<dyn SessionSource> = source.clone();
    let results = Arc::new(ResultCache::new(Duration::from_secs(60), 100));
    let service = ExerciseHistoryService::new(
        dyn_source,
        cache,
        mappings,
        results,
        fetch,
        history_settings(),
    )
    .with_clock(Arc::new(FixedClock(now)));
    Harness { source, service }
}

/// Assert two floats agree to within 1e-9
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
