// ABOUTME: Aggregated exercise history structures exposed to the presentation layer
// ABOUTME: Daily volume series, per-exercise history entries, and the full history report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Calendar day to cumulative volume
pub type DailyVolumeMap = BTreeMap<NaiveDate, f64>;

/// Exercise name to its most recent finish timestamp
pub type LastTimeMap = BTreeMap<String, DateTime<Utc>>;

/// Muscle group to fatigue in `[0, 1]`; muscles never trained are absent
pub type MuscleFatigueState = BTreeMap<String, f64>;

/// One point of the global daily volume series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    /// Calendar day
    pub date: NaiveDate,
    /// Total volume lifted that day
    pub volume: f64,
}

/// One session of an exercise's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Calendar day of the session
    pub date: NaiveDate,
    /// Exercise volume in that session
    pub volume: f64,
    /// Heaviest set weight in that session
    pub max_weight: f64,
}

/// Rolling history of one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistoryEntry {
    /// Exercise name
    pub exercise_name: String,
    /// Most recent sessions, oldest first, capped for display
    pub ordered_history: Vec<HistoryPoint>,
    /// Number of sessions across the full history
    pub session_count: usize,
    /// Heaviest set weight across the full history
    pub max_weight_overall: f64,
    /// Handle or attachment type used, when mapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_type: Option<String>,
}

/// Output of the aggregation engine for one user
///
/// This is the payload memoized by the in-memory result cache; fatigue is derived from it
/// on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryAggregate {
    /// Global volume per day, ascending by date
    pub daily_volume: Vec<DailyVolume>,
    /// Volume per exercise per day
    pub exercise_daily: BTreeMap<String, DailyVolumeMap>,
    /// Latest finish timestamp per exercise
    pub exercise_last_time: LastTimeMap,
    /// Recently active exercises, sorted by name
    pub exercises: Vec<ExerciseHistoryEntry>,
}

/// Complete exercise history payload consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseHistoryReport {
    /// Global volume per day
    pub daily_volume: Vec<DailyVolume>,
    /// Volume per exercise per day
    pub exercise_daily: BTreeMap<String, DailyVolumeMap>,
    /// Latest finish timestamp per exercise
    pub exercise_last_time: LastTimeMap,
    /// Recently active exercises
    pub exercises: Vec<ExerciseHistoryEntry>,
    /// Current fatigue per muscle group
    pub muscle_fatigue: MuscleFatigueState,
    /// Recovery time the fatigue values were computed with
    pub recovery_hours: f64,
}
