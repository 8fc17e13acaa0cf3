// ABOUTME: In-memory session source with deterministic data for development and tests
// ABOUTME: Supports failure injection, artificial latency, and call counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Synthetic Session Source
//!
//! Stands in for the upstream training API without any network access. Sessions are
//! injected up front or at runtime, and the source records how it was called so tests
//! can assert on cache behaviour (how many detail fetches happened, peak parallelism).
//!
//! The calendar window argument is ignored: every injected stub is returned.

use crate::SessionSource;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime};
use liftlog_core::constants::service_names::SYNTHETIC;
use liftlog_core::errors::{AppError, AppResult};
use liftlog_core::models::{ExerciseDetail, SessionId, SessionStub, SetDetail, TrainingDetail};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Default)]
struct SyntheticData {
    stubs: Vec<SessionStub>,
    details: HashMap<SessionId, TrainingDetail>,
    failing: HashSet<SessionId>,
}

/// Synthetic session source for development and testing
#[derive(Default)]
pub struct SyntheticSessionSource {
    data: RwLock<SyntheticData>,
    detail_delay: Option<Duration>,
    calendar_unavailable: AtomicBool,
    calendar_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Tracks one in-flight detail fetch
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SyntheticSessionSource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a completed session and its detail payload
    #[must_use]
    pub fn with_session(self, stub: SessionStub, detail: TrainingDetail) -> Self {
        if let Ok(mut data) = self.data.write() {
            data.details.insert(stub.session_id.clone(), detail);
            data.stubs.push(stub);
        }
        self
    }

    /// Make detail fetches for `session_id` fail
    #[must_use]
    pub fn with_failing_session(self, session_id: impl Into<SessionId>) -> Self {
        if let Ok(mut data) = self.data.write() {
            data.failing.insert(session_id.into());
        }
        self
    }

    /// Delay every detail fetch by `delay`
    #[must_use]
    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    /// Add a session while the source is in use
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned
    pub fn add_session(&self, stub: SessionStub, detail: TrainingDetail) -> AppResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AppError::internal("synthetic source lock poisoned"))?;
        data.details.insert(stub.session_id.clone(), detail);
        data.stubs.push(stub);
        Ok(())
    }

    /// Make every calendar request fail (or succeed again)
    pub fn set_calendar_unavailable(&self, unavailable: bool) {
        self.calendar_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calendar requests served
    #[must_use]
    pub fn calendar_calls(&self) -> usize {
        self.calendar_calls.load(Ordering::SeqCst)
    }

    /// Number of detail requests served, including failed ones
    #[must_use]
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    /// Highest number of detail requests that were in flight at once
    #[must_use]
    pub fn peak_concurrency(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Six weeks of plausible strength training ending on `today`
    #[must_use]
    pub fn demo(today: NaiveDate) -> Self {
        const ROTATION: [&[(&str, f64, u32)]; 3] = [
            &[("Back Squat", 60.0, 8), ("Romanian Deadlift", 50.0, 10)],
            &[("Bench Press", 45.0, 8), ("Seated Row", 40.0, 12), ("Biceps Curl", 12.5, 12)],
            &[("Overhead Press", 30.0, 8), ("Lat Pulldown", 42.5, 10)],
        ];

        let mut source = Self::new();
        let mut session_number = 90_000_u64;
        for days_ago in (0..42_i64).rev().filter(|d| d % 2 == 0) {
            let date = today - ChronoDuration::days(days_ago);
            let plan = ROTATION[(days_ago as usize / 2) % ROTATION.len()];
            let exercises = plan
                .iter()
                .map(|&(name, weight, reps)| demo_exercise(name, weight, reps, days_ago))
                .collect();

            session_number += 1;
            let finish = date.and_time(NaiveTime::from_hms_opt(18, 30, 0).unwrap_or(NaiveTime::MIN));
            let stub = SessionStub::completed(session_number, date).with_finish_time(finish.and_utc());
            source = source.with_session(stub, TrainingDetail::with_exercises(exercises));
        }
        source
    }
}

fn demo_exercise(name: &str, weight: f64, reps: u32, days_ago: i64) -> ExerciseDetail {
    // Slow linear progression: later sessions are slightly heavier
    let progressed = weight + (42 - days_ago) as f64 * 0.25;
    let reps = f64::from(reps);
    let sets = (0..3)
        .map(|_| SetDetail {
            capacity: progressed * reps,
            finished_count: reps,
            target_count: reps,
            weight: progressed,
            timestamp: None,
        })
        .collect();
    ExerciseDetail {
        action_library_name: Some(name.to_owned()),
        name: None,
        finished_reps: Some(sets),
    }
}

#[async_trait]
impl SessionSource for SyntheticSessionSource {
    fn name(&self) -> &'static str {
        SYNTHETIC
    }

    async fn fetch_calendar_window(&self, user_id: &str, _months: u32) -> AppResult<Vec<SessionStub>> {
        self.calendar_calls.fetch_add(1, Ordering::SeqCst);
        if self.calendar_unavailable.load(Ordering::SeqCst) {
            return Err(AppError::upstream_unavailable("synthetic calendar unavailable")
                .with_user_id(user_id));
        }
        let data = self
            .data
            .read()
            .map_err(|_| AppError::internal("synthetic source lock poisoned"))?;
        Ok(data.stubs.clone())
    }

    async fn fetch_training_detail(
        &self,
        _user_id: &str,
        session_id: &SessionId,
    ) -> AppResult<TrainingDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        if let Some(delay) = self.detail_delay {
            sleep(delay).await;
        }

        let data = self
            .data
            .read()
            .map_err(|_| AppError::internal("synthetic source lock poisoned"))?;
        if data.failing.contains(session_id) {
            return Err(AppError::external_service(SYNTHETIC, "injected detail failure")
                .with_resource_id(session_id.as_str()));
        }
        data.details
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("training session {session_id}")))
    }
}
