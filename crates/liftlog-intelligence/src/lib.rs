// ABOUTME: Exercise history algorithms: detail extraction, volume aggregation, and fatigue decay
// ABOUTME: Pure functions over session records and mapping data, free of I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # LiftLog Intelligence
//!
//! Algorithms behind the exercise history report. Everything here is deterministic:
//! callers pass "today" and "now" explicitly so results can be reproduced in tests.

/// Aggregation engine (daily volume, last-performed times, exercise histories)
pub mod aggregation;
/// Raw training detail to session record extraction
pub mod extraction;
/// Per-muscle fatigue by chronological stacking decay
pub mod fatigue;

pub use aggregation::{aggregate_history, AggregationOptions};
pub use extraction::extract_session_records;
pub use fatigue::{compute_muscle_fatigue, stacked_fatigue, FatigueEvent, RecoveryHours};

/// Round to one decimal place, the precision volumes and weights are reported with
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
