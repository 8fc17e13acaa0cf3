// ABOUTME: Raw training detail payload returned by the upstream fitness API for one session
// ABOUTME: Per-exercise set lists with capacity, rep counts, and timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full per-set performance payload for one completed session
///
/// Depending on the endpoint version the exercise list is published under one of two
/// keys; [`TrainingDetail::exercises`] hides that difference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDetail {
    /// Exercise list published by the completed-training endpoint
    #[serde(
        default,
        rename = "cttActionLibraryTrainingInfoList",
        deserialize_with = "lenient::vec_skip_invalid"
    )]
    pub ctt_exercises: Option<Vec<ExerciseDetail>>,
    /// Exercise list published by older endpoint versions
    #[serde(
        default,
        rename = "actionLibraryTrainingInfoList",
        deserialize_with = "lenient::vec_skip_invalid"
    )]
    pub legacy_exercises: Option<Vec<ExerciseDetail>>,
}

impl TrainingDetail {
    /// Create a detail payload from an exercise list
    #[must_use]
    pub const fn with_exercises(exercises: Vec<ExerciseDetail>) -> Self {
        Self {
            ctt_exercises: Some(exercises),
            legacy_exercises: None,
        }
    }

    /// Exercises in the payload, preferring the completed-training list when non-empty
    #[must_use]
    pub fn exercises(&self) -> &[ExerciseDetail] {
        match (&self.ctt_exercises, &self.legacy_exercises) {
            (Some(primary), _) if !primary.is_empty() => primary.as_slice(),
            (_, Some(legacy)) => legacy.as_slice(),
            (Some(primary), None) => primary.as_slice(),
            (None, None) => &[],
        }
    }
}

/// One exercise performed within a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetail {
    /// Exercise library name
    #[serde(default, deserialize_with = "lenient::trimmed_string")]
    pub action_library_name: Option<String>,
    /// Alternative name field used by some payloads
    #[serde(default, deserialize_with = "lenient::trimmed_string")]
    pub name: Option<String>,
    /// Completed sets
    #[serde(default, deserialize_with = "lenient::vec_skip_invalid")]
    pub finished_reps: Option<Vec<SetDetail>>,
}

impl ExerciseDetail {
    /// Sets performed, empty when the payload omitted them
    #[must_use]
    pub fn sets(&self) -> &[SetDetail] {
        self.finished_reps.as_deref().unwrap_or_default()
    }
}

/// One completed set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDetail {
    /// Set volume (reps x weight)
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub capacity: f64,
    /// Reps actually completed
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub finished_count: f64,
    /// Reps prescribed by the plan
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub target_count: f64,
    /// Average weight as reported upstream; may disagree with capacity / reps
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub weight: f64,
    /// When the set was completed
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_back_to_legacy_exercise_list() {
        let detail: TrainingDetail = serde_json::from_str(
            r#"{
                "cttActionLibraryTrainingInfoList": [],
                "actionLibraryTrainingInfoList": [
                    {"name": " Bench Press ", "finishedReps": [{"capacity": "300", "finishedCount": 10}]}
                ]
            }"#,
        )
        .unwrap();

        let exercises = detail.exercises();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name.as_deref(), Some("Bench Press"));
        assert!((exercises[0].sets()[0].capacity - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_lists_yield_no_exercises() {
        let detail: TrainingDetail = serde_json::from_str(r#"{"title": "Push"}"#).unwrap();
        assert!(detail.exercises().is_empty());
    }

    #[test]
    fn test_malformed_exercise_entries_do_not_drop_valid_ones() {
        let detail: TrainingDetail = serde_json::from_str(
            r#"{
                "cttActionLibraryTrainingInfoList": [
                    {"actionLibraryName": "Squat", "finishedReps": [{"capacity": 500, "finishedCount": 5}]},
                    {"actionLibraryName": "Row", "finishedReps": {"capacity": 5}},
                    null,
                    "garbage",
                    {"actionLibraryName": "Curl", "finishedReps": [null, {"capacity": 120, "finishedCount": 12}, 7]}
                ]
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = detail
            .exercises()
            .iter()
            .filter_map(|e| e.action_library_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Squat", "Row", "Curl"]);
        assert_eq!(detail.exercises()[0].sets().len(), 1);
        assert!(detail.exercises()[1].sets().is_empty());
        assert_eq!(detail.exercises()[2].sets().len(), 1);
    }

    #[test]
    fn test_non_list_exercise_field_falls_back_to_legacy_list() {
        let detail: TrainingDetail = serde_json::from_str(
            r#"{
                "cttActionLibraryTrainingInfoList": {"unexpected": true},
                "actionLibraryTrainingInfoList": [{"name": "Dip"}]
            }"#,
        )
        .unwrap();

        assert_eq!(detail.exercises().len(), 1);
        assert_eq!(detail.exercises()[0].name.as_deref(), Some("Dip"));
    }
}
