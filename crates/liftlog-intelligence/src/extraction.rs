// ABOUTME: Converts a raw training detail payload into immutable per-exercise session records
// ABOUTME: Derives volume and max weight from set capacity and completed rep counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session detail extraction
//!
//! Weight per set is always derived as `capacity / finished reps`. The payload also carries
//! an average-weight field, but it can disagree with the recorded capacity and is ignored.

use crate::round_tenth;
use liftlog_core::constants::aggregation::UNKNOWN_EXERCISE;
use liftlog_core::models::{ExerciseDetail, SessionRecord, SessionStub, TrainingDetail};

/// Extract one record per exercise in the session
///
/// The session date comes from the calendar stub. The finish timestamp prefers the
/// calendar's finish time and falls back to the latest set timestamp in the payload.
/// A payload without an exercise list yields no records.
#[must_use]
pub fn extract_session_records(stub: &SessionStub, detail: &TrainingDetail) -> Vec<SessionRecord> {
    let exercises = detail.exercises();
    let finish_timestamp = stub.finish_time.or_else(|| {
        exercises
            .iter()
            .flat_map(ExerciseDetail::sets)
            .filter_map(|set| set.timestamp)
            .max()
    });

    exercises
        .iter()
        .map(|exercise| SessionRecord {
            session_id: stub.session_id.clone(),
            date: stub.date,
            finish_timestamp,
            volume_kg: round_tenth(exercise_volume(exercise)),
            max_weight_kg: round_tenth(exercise_max_weight(exercise)),
            exercise_name: exercise_name(exercise),
        })
        .collect()
}

/// Display name of an exercise, falling back through the known name fields
#[must_use]
pub fn exercise_name(exercise: &ExerciseDetail) -> String {
    exercise
        .action_library_name
        .as_deref()
        .or(exercise.name.as_deref())
        .unwrap_or(UNKNOWN_EXERCISE)
        .to_owned()
}

/// Total capacity of all sets
#[must_use]
pub fn exercise_volume(exercise: &ExerciseDetail) -> f64 {
    exercise.sets().iter().map(|set| set.capacity).sum()
}

/// Heaviest per-set weight, or 0 when no set has both capacity and reps
#[must_use]
pub fn exercise_max_weight(exercise: &ExerciseDetail) -> f64 {
    exercise
        .sets()
        .iter()
        .filter(|set| set.capacity > 0.0 && set.finished_count > 0.0)
        .map(|set| set.capacity / set.finished_count)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use liftlog_core::models::SetDetail;

    fn set(capacity: f64, reps: f64, weight: f64) -> SetDetail {
        SetDetail {
            capacity,
            finished_count: reps,
            target_count: reps,
            weight,
            timestamp: None,
        }
    }

    fn stub() -> SessionStub {
        SessionStub::completed("9001", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn test_weight_is_derived_from_capacity_over_reps() {
        let exercise = ExerciseDetail {
            action_library_name: Some("Squat".to_owned()),
            name: None,
            // Reported weight of 999 must be ignored
            finished_reps: Some(vec![set(500.0, 10.0, 999.0), set(480.0, 8.0, 999.0)]),
        };
        let records =
            extract_session_records(&stub(), &TrainingDetail::with_exercises(vec![exercise]));

        assert_eq!(records.len(), 1);
        assert!((records[0].volume_kg - 980.0).abs() < 1e-9);
        assert!((records[0].max_weight_kg - 60.0).abs() < 1e-9);
        assert_eq!(records[0].exercise_name, "Squat");
    }

    #[test]
    fn test_sets_without_reps_add_volume_but_not_weight() {
        let exercise = ExerciseDetail {
            action_library_name: None,
            name: None,
            finished_reps: Some(vec![set(120.0, 0.0, 0.0)]),
        };
        let records =
            extract_session_records(&stub(), &TrainingDetail::with_exercises(vec![exercise]));

        assert_eq!(records[0].exercise_name, UNKNOWN_EXERCISE);
        assert!((records[0].volume_kg - 120.0).abs() < 1e-9);
        assert!(records[0].max_weight_kg.abs() < 1e-9);
    }

    #[test]
    fn test_finish_timestamp_falls_back_to_latest_set() {
        let early = Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 1, 17, 45, 0).unwrap();
        let mut first = set(100.0, 10.0, 10.0);
        first.timestamp = Some(early);
        let mut second = set(100.0, 10.0, 10.0);
        second.timestamp = Some(late);
        let exercise = ExerciseDetail {
            action_library_name: Some("Row".to_owned()),
            name: None,
            finished_reps: Some(vec![first, second]),
        };
        let detail = TrainingDetail::with_exercises(vec![exercise]);

        let records = extract_session_records(&stub(), &detail);
        assert_eq!(records[0].finish_timestamp, Some(late));

        let calendar_finish = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let records =
            extract_session_records(&stub().with_finish_time(calendar_finish), &detail);
        assert_eq!(records[0].finish_timestamp, Some(calendar_finish));
    }

    #[test]
    fn test_empty_payload_yields_no_records() {
        assert!(extract_session_records(&stub(), &TrainingDetail::default()).is_empty());
    }
}
