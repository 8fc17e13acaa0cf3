// ABOUTME: Aggregation engine folding session records into daily volume series and exercise histories
// ABOUTME: Produces global and per-exercise daily volume, last-performed times, and capped histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Aggregation Engine
//!
//! Input is every [`SessionRecord`] for a user over the requested window, in any order:
//! fetch completion order must never affect the output, so chronological order is
//! re-established here by session date.
//!
//! Rules:
//! - records with zero or negative volume are noise (abandoned sets) and are ignored
//!   everywhere; a session reaches the global daily series only if its total volume is
//!   positive
//! - each exercise keeps its most recent `history_limit` sessions for display while
//!   `session_count` and `max_weight_overall` reflect the full history
//! - the last-performed map takes the latest finish timestamp regardless of the cap

use crate::round_tenth;
use chrono::{Duration, NaiveDate};
use liftlog_core::constants::aggregation::{ACTIVE_WINDOW_DAYS, HISTORY_LIMIT};
use liftlog_core::models::{
    DailyVolume, DailyVolumeMap, ExerciseHistoryEntry, HistoryAggregate, HistoryPoint,
    LastTimeMap, SessionId, SessionRecord,
};
use std::collections::{BTreeMap, HashMap};

/// Tunables for one aggregation pass
#[derive(Debug, Clone)]
pub struct AggregationOptions {
    /// Sessions kept in each exercise's display history
    pub history_limit: usize,
    /// Exercises idle for longer than this are left out of the exercise list
    /// (`None` keeps every exercise)
    pub active_window_days: Option<u32>,
    /// Reference day for the active window
    pub today: NaiveDate,
}

impl AggregationOptions {
    /// Default options relative to `today`
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            active_window_days: Some(ACTIVE_WINDOW_DAYS),
            today,
        }
    }

    /// Keep every exercise regardless of when it was last performed
    #[must_use]
    pub fn without_active_window(mut self) -> Self {
        self.active_window_days = None;
        self
    }

    fn active_cutoff(&self) -> Option<NaiveDate> {
        self.active_window_days
            .map(|days| self.today - Duration::days(i64::from(days)))
    }
}

/// Aggregate session records into the history payload
#[must_use]
pub fn aggregate_history(records: &[SessionRecord], options: &AggregationOptions) -> HistoryAggregate {
    let counted: Vec<&SessionRecord> = records.iter().filter(|r| r.volume_kg > 0.0).collect();

    HistoryAggregate {
        daily_volume: build_daily_volume(&counted),
        exercise_daily: build_exercise_daily(&counted),
        exercise_last_time: build_last_times(&counted),
        exercises: build_exercise_histories(&counted, options),
    }
}

fn build_daily_volume(records: &[&SessionRecord]) -> Vec<DailyVolume> {
    let mut sessions: HashMap<&SessionId, (NaiveDate, f64)> = HashMap::new();
    for record in records {
        let entry = sessions
            .entry(&record.session_id)
            .or_insert((record.date, 0.0));
        entry.1 += record.volume_kg;
    }

    let mut per_day = DailyVolumeMap::new();
    for (date, total) in sessions.into_values() {
        if total > 0.0 {
            *per_day.entry(date).or_insert(0.0) += total;
        }
    }

    per_day
        .into_iter()
        .map(|(date, volume)| DailyVolume {
            date,
            volume: round_tenth(volume),
        })
        .collect()
}

fn build_exercise_daily(records: &[&SessionRecord]) -> BTreeMap<String, DailyVolumeMap> {
    let mut exercise_daily: BTreeMap<String, DailyVolumeMap> = BTreeMap::new();
    for record in records {
        let days = exercise_daily
            .entry(record.exercise_name.clone())
            .or_default();
        let total = days.entry(record.date).or_insert(0.0);
        *total = round_tenth(*total + record.volume_kg);
    }
    exercise_daily
}

fn build_last_times(records: &[&SessionRecord]) -> LastTimeMap {
    let mut last_times = LastTimeMap::new();
    for record in records {
        let Some(finished) = record.finish_timestamp else {
            continue;
        };
        last_times
            .entry(record.exercise_name.clone())
            .and_modify(|latest| *latest = (*latest).max(finished))
            .or_insert(finished);
    }
    last_times
}

fn build_exercise_histories(
    records: &[&SessionRecord],
    options: &AggregationOptions,
) -> Vec<ExerciseHistoryEntry> {
    let mut by_exercise: BTreeMap<&str, Vec<&SessionRecord>> = BTreeMap::new();
    for &record in records {
        by_exercise
            .entry(record.exercise_name.as_str())
            .or_default()
            .push(record);
    }

    let cutoff = options.active_cutoff();
    by_exercise
        .into_iter()
        .filter_map(|(name, mut sessions)| {
            // Total order so same-day sessions land identically whatever the fetch order
            sessions.sort_by(|a, b| {
                (a.date, a.finish_timestamp, &a.session_id)
                    .cmp(&(b.date, b.finish_timestamp, &b.session_id))
            });
            let latest = sessions.last()?.date;
            if cutoff.is_some_and(|cutoff| latest < cutoff) {
                return None;
            }

            let session_count = sessions.len();
            let max_weight_overall = round_tenth(
                sessions
                    .iter()
                    .map(|record| record.max_weight_kg)
                    .fold(0.0, f64::max),
            );
            let keep_from = session_count.saturating_sub(options.history_limit);
            let ordered_history = sessions[keep_from..]
                .iter()
                .map(|record| HistoryPoint {
                    date: record.date,
                    volume: record.volume_kg,
                    max_weight: record.max_weight_kg,
                })
                .collect();

            Some(ExerciseHistoryEntry {
                exercise_name: name.to_owned(),
                ordered_history,
                session_count,
                max_weight_overall,
                handle_type: None,
            })
        })
        .collect()
}
