// ABOUTME: Exercise history service wiring calendar, fetch coordinator, caches, and algorithms
// ABOUTME: Entry point producing the full history report with per-muscle fatigue for a user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise History Service
//!
//! `get_exercise_history` runs the whole pipeline:
//!
//! ```text
//! calendar window -> fetch coordinator (detail cache | upstream) -> aggregation
//!      -> result cache (per user, TTL) -> fatigue decay at `now` -> report
//! ```
//!
//! The aggregation is memoized; fatigue is recomputed on every call because it depends on
//! the current time and the requested recovery hours.

use super::coordinator::FetchCoordinator;
use crate::cache::result::ResultCache;
use crate::cache::DetailCache;
use crate::config::{EngineConfig, FetchSettings, HistorySettings};
use crate::errors::AppResult;
use crate::mapping::MappingProvider;
use chrono::{DateTime, Utc};
use liftlog_core::models::{ExerciseHistoryReport, HistoryAggregate, MappingSet};
use liftlog_intelligence::{aggregate_history, compute_muscle_fatigue, AggregationOptions, RecoveryHours};
use liftlog_providers::SessionSource;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds exercise history reports for users
pub struct ExerciseHistoryService {
    source: Arc<dyn SessionSource>,
    coordinator: FetchCoordinator,
    mappings: Arc<dyn MappingProvider>,
    results: Arc<ResultCache<HistoryAggregate>>,
    calendar_months: u32,
    history: HistorySettings,
    clock: Arc<dyn Clock>,
}

impl ExerciseHistoryService {
    /// Service using the given collaborators and settings
    #[must_use]
    pub fn new(
        source: Arc<dyn SessionSource>,
        detail_cache: Arc<dyn DetailCache>,
        mappings: Arc<dyn MappingProvider>,
        results: Arc<ResultCache<HistoryAggregate>>,
        fetch: &FetchSettings,
        history: HistorySettings,
    ) -> Self {
        Self {
            coordinator: FetchCoordinator::new(Arc::clone(&source), detail_cache, fetch),
            source,
            mappings,
            results,
            calendar_months: fetch.calendar_months,
            history,
            clock: Arc::new(SystemClock),
        }
    }

    /// Service configured from an [`EngineConfig`], with a fresh result cache
    #[must_use]
    pub fn from_config(
        config: &EngineConfig,
        source: Arc<dyn SessionSource>,
        detail_cache: Arc<dyn DetailCache>,
        mappings: Arc<dyn MappingProvider>,
    ) -> Self {
        let results = Arc::new(ResultCache::new(
            config.cache.result_ttl,
            config.cache.result_cache_max_users,
        ));
        Self::new(
            source,
            detail_cache,
            mappings,
            results,
            &config.fetch,
            config.history.clone(),
        )
    }

    /// Use `clock` for "now" and "today"
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Recovery hours applied when the caller has no preference
    #[must_use]
    pub const fn default_recovery_hours(&self) -> f64 {
        self.history.default_recovery_hours
    }

    /// Full exercise history report for `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error only if the training calendar could not be loaded. Individual
    /// session failures, cache failures, and mapping failures degrade the report instead.
    #[instrument(skip_all, fields(user.id = %user_id, recovery_hours = recovery_hours))]
    pub async fn get_exercise_history(
        &self,
        user_id: &str,
        recovery_hours: f64,
    ) -> AppResult<ExerciseHistoryReport> {
        let aggregate = self
            .results
            .get_or_compute(user_id, || self.build_aggregate(user_id))
            .await?;
        let mapping = self.load_mapping(user_id).await;
        let recovery = RecoveryHours::new(recovery_hours);

        let muscle_fatigue = compute_muscle_fatigue(
            &aggregate.exercise_daily,
            &aggregate.exercise_last_time,
            &mapping,
            recovery,
            self.clock.now(),
        );

        let mut exercises = aggregate.exercises.clone();
        for entry in &mut exercises {
            entry.handle_type = mapping
                .handle_type_for(&entry.exercise_name)
                .map(str::to_owned);
        }

        Ok(ExerciseHistoryReport {
            daily_volume: aggregate.daily_volume.clone(),
            exercise_daily: aggregate.exercise_daily.clone(),
            exercise_last_time: aggregate.exercise_last_time.clone(),
            exercises,
            muscle_fatigue,
            recovery_hours: recovery.hours(),
        })
    }

    /// Drop the memoized aggregation for `user_id`
    pub async fn invalidate(&self, user_id: &str) {
        self.results.invalidate(user_id).await;
    }

    async fn build_aggregate(&self, user_id: &str) -> AppResult<HistoryAggregate> {
        let started = Instant::now();
        let stubs = self
            .source
            .fetch_calendar_window(user_id, self.calendar_months)
            .await
            .map_err(|e| e.with_user_id(user_id))?;

        let outcome = self.coordinator.collect(user_id, &stubs).await;
        let stats = outcome.stats;
        let records = outcome.into_records();

        let options = AggregationOptions {
            history_limit: self.history.history_limit,
            active_window_days: self.history.active_window_days,
            today: self.clock.now().date_naive(),
        };
        let aggregate = aggregate_history(&records, &options);

        info!(
            user.id = %user_id,
            sessions.listed = stubs.len(),
            sessions.failed = stats.failed,
            records = records.len(),
            exercises = aggregate.exercises.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Exercise history aggregated"
        );
        Ok(aggregate)
    }

    async fn load_mapping(&self, user_id: &str) -> MappingSet {
        match self.mappings.get_mapping(user_id).await {
            Ok(mapping) => mapping,
            Err(e) => {
                warn!(user.id = %user_id, error = %e, "Mapping unavailable, fatigue will be empty");
                MappingSet::default()
            }
        }
    }
}
