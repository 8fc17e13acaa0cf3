// ABOUTME: Fatigue decay engine turning exercise-days into per-muscle fatigue via stacking linear decay
// ABOUTME: Primary and secondary muscle events accumulate chronologically, saturate at 1.0, and decay to now
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fatigue Decay Engine
//!
//! Each exercise-day with volume produces one fatigue event of magnitude 1.0 on the
//! exercise's primary muscle and, when a secondary muscle is mapped, an event of
//! `secondary_percent / 100` on that muscle. Events stack per muscle in chronological
//! order:
//!
//! ```text
//! fatigue = max(0, fatigue - elapsed_hours / recovery_hours)   // decay since previous event
//! fatigue = min(1, fatigue + magnitude)                        // apply event, saturate
//! ```
//!
//! and a final decay step runs from the last event to `now`. Decay is linear so that
//! `recovery_hours` reads directly as "time from fully fatigued to fully recovered".
//!
//! Secondary events decay at the same rate as primary ones.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use liftlog_core::constants::fatigue::{
    DEFAULT_RECOVERY_HOURS, FALLBACK_EVENT_HOUR, MAX_FATIGUE, MAX_RECOVERY_HOURS,
    MIN_RECOVERY_HOURS, PRIMARY_EVENT_MAGNITUDE,
};
use liftlog_core::models::{DailyVolumeMap, LastTimeMap, MappingSet, MuscleFatigueState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Seconds per hour, for converting elapsed durations
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Time for a fully fatigued muscle to recover, kept within 24-168 hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecoveryHours(f64);

impl RecoveryHours {
    /// Create a recovery time, clamping into the accepted range
    #[must_use]
    pub fn new(hours: f64) -> Self {
        if !hours.is_finite() {
            return Self::default();
        }
        let clamped = hours.clamp(MIN_RECOVERY_HOURS, MAX_RECOVERY_HOURS);
        if (clamped - hours).abs() > f64::EPSILON {
            debug!(requested = hours, applied = clamped, "Recovery hours clamped");
        }
        Self(clamped)
    }

    /// Hours as a float
    #[must_use]
    pub const fn hours(self) -> f64 {
        self.0
    }
}

impl Default for RecoveryHours {
    fn default() -> Self {
        Self(DEFAULT_RECOVERY_HOURS)
    }
}

/// One training stimulus on one muscle group
#[derive(Debug, Clone, PartialEq)]
pub struct FatigueEvent {
    /// Muscle group loaded
    pub muscle: String,
    /// When the stimulus happened
    pub at: DateTime<Utc>,
    /// Fatigue added, before saturation
    pub magnitude: f64,
}

/// Build fatigue events from per-exercise daily volume
///
/// Exercises without a muscle mapping produce no events. The event time is the exercise's
/// last-performed timestamp when that falls on the same day, otherwise mid-day.
#[must_use]
pub fn build_fatigue_events(
    exercise_daily: &BTreeMap<String, DailyVolumeMap>,
    last_times: &LastTimeMap,
    mapping: &MappingSet,
) -> Vec<FatigueEvent> {
    let mut events = Vec::new();
    for (exercise, days) in exercise_daily {
        let Some(muscles) = mapping.muscles_for(exercise) else {
            continue;
        };
        if muscles.primary.trim().is_empty() {
            continue;
        }
        let last_time = last_times.get(exercise);

        for (&day, &volume) in days {
            if volume <= 0.0 {
                continue;
            }
            let at = event_time(day, last_time);
            events.push(FatigueEvent {
                muscle: muscles.primary.clone(),
                at,
                magnitude: PRIMARY_EVENT_MAGNITUDE,
            });
            if let Some((secondary, magnitude)) = muscles.secondary_magnitude() {
                events.push(FatigueEvent {
                    muscle: secondary.to_owned(),
                    at,
                    magnitude,
                });
            }
        }
    }
    events
}

/// Current fatigue per muscle group
///
/// Muscles with no events are absent from the result, which distinguishes "never trained"
/// from "fully recovered" (present with 0.0).
#[must_use]
pub fn compute_muscle_fatigue(
    exercise_daily: &BTreeMap<String, DailyVolumeMap>,
    last_times: &LastTimeMap,
    mapping: &MappingSet,
    recovery: RecoveryHours,
    now: DateTime<Utc>,
) -> MuscleFatigueState {
    let mut per_muscle: BTreeMap<String, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    for event in build_fatigue_events(exercise_daily, last_times, mapping) {
        per_muscle
            .entry(event.muscle)
            .or_default()
            .push((event.at, event.magnitude));
    }

    per_muscle
        .into_iter()
        .map(|(muscle, mut events)| {
            events.sort_by_key(|(at, _)| *at);
            (muscle, stacked_fatigue(&events, recovery, now))
        })
        .collect()
}

/// Run the stacking decay over chronologically sorted `(time, magnitude)` events
#[must_use]
pub fn stacked_fatigue(
    events: &[(DateTime<Utc>, f64)],
    recovery: RecoveryHours,
    now: DateTime<Utc>,
) -> f64 {
    let mut fatigue = 0.0;
    let mut previous: Option<DateTime<Utc>> = None;

    for &(at, magnitude) in events {
        if let Some(previous) = previous {
            fatigue = decay(fatigue, hours_between(previous, at), recovery);
        }
        fatigue = (fatigue + magnitude).min(MAX_FATIGUE);
        previous = Some(at);
    }

    match previous {
        Some(last) => decay(fatigue, hours_between(last, now), recovery),
        None => 0.0,
    }
}

fn decay(fatigue: f64, elapsed_hours: f64, recovery: RecoveryHours) -> f64 {
    (fatigue - elapsed_hours / recovery.hours()).max(0.0)
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let seconds = (later - earlier).num_seconds().max(0);
    seconds as f64 / SECONDS_PER_HOUR
}

fn event_time(day: NaiveDate, last_time: Option<&DateTime<Utc>>) -> DateTime<Utc> {
    match last_time {
        Some(last) if last.date_naive() == day => *last,
        _ => {
            let midday = NaiveTime::from_hms_opt(FALLBACK_EVENT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
            day.and_time(midday).and_utc()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_recovery_hours_are_clamped() {
        assert!((RecoveryHours::new(10.0).hours() - 24.0).abs() < f64::EPSILON);
        assert!((RecoveryHours::new(500.0).hours() - 168.0).abs() < f64::EPSILON);
        assert!((RecoveryHours::new(f64::NAN).hours() - 96.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_time_prefers_same_day_finish_time() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 6, 3, 19, 15, 0).unwrap();
        assert_eq!(event_time(day, Some(&finished)), finished);

        let other_day = Utc.with_ymd_and_hms(2024, 6, 5, 7, 0, 0).unwrap();
        assert_eq!(
            event_time(day, Some(&other_day)),
            Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_decay_floors_at_zero_between_events() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let recovery = RecoveryHours::new(24.0);
        let events = [(t0, 0.5), (t0 + Duration::hours(72), 0.25)];

        let fatigue = stacked_fatigue(&events, recovery, t0 + Duration::hours(72));
        assert!((fatigue - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_now_before_last_event_does_not_add_fatigue() {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let fatigue =
            stacked_fatigue(&[(t0, 0.8)], RecoveryHours::default(), t0 - Duration::hours(5));
        assert!((fatigue - 0.8).abs() < 1e-9);
    }
}
