// ABOUTME: Exercise-to-muscle and exercise-to-handle-type mapping data
// ABOUTME: Supplied to the engine read-only; accepts both bare-string and detailed muscle entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Muscle groups an exercise loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MuscleMappingRepr")]
pub struct MuscleMapping {
    /// Main muscle group worked
    pub primary: String,
    /// Partially worked muscle group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Share of a primary event the secondary muscle receives, in percent (0-100)
    #[serde(default)]
    pub secondary_percent: f64,
}

impl MuscleMapping {
    /// Mapping with a primary muscle only
    #[must_use]
    pub fn primary(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
            secondary_percent: 0.0,
        }
    }

    /// Add a secondary muscle receiving `percent` of each primary event
    #[must_use]
    pub fn with_secondary(mut self, secondary: impl Into<String>, percent: f64) -> Self {
        self.secondary = Some(secondary.into());
        self.secondary_percent = percent;
        self
    }

    /// Fatigue magnitude contributed to the secondary muscle, if one is configured
    #[must_use]
    pub fn secondary_magnitude(&self) -> Option<(&str, f64)> {
        let secondary = self.secondary.as_deref().filter(|s| !s.trim().is_empty())?;
        let magnitude = (self.secondary_percent / 100.0).clamp(0.0, 1.0);
        (magnitude > 0.0).then_some((secondary, magnitude))
    }
}

/// Stored form: muscle files written by older clients hold a bare group name
#[derive(Deserialize)]
#[serde(untagged)]
enum MuscleMappingRepr {
    Bare(String),
    Detailed {
        primary: String,
        #[serde(default)]
        secondary: Option<String>,
        #[serde(default, alias = "secondaryPercent")]
        secondary_percent: f64,
    },
}

impl From<MuscleMappingRepr> for MuscleMapping {
    fn from(repr: MuscleMappingRepr) -> Self {
        match repr {
            MuscleMappingRepr::Bare(primary) => Self::primary(primary),
            MuscleMappingRepr::Detailed {
                primary,
                secondary,
                secondary_percent,
            } => Self {
                primary,
                secondary,
                secondary_percent,
            },
        }
    }
}

/// All mapping data for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingSet {
    /// Exercise name to muscle groups
    #[serde(default)]
    pub muscles: HashMap<String, MuscleMapping>,
    /// Exercise name to handle/attachment type
    #[serde(default)]
    pub handle_types: HashMap<String, String>,
}

impl MappingSet {
    /// Muscle mapping for an exercise, if configured
    #[must_use]
    pub fn muscles_for(&self, exercise: &str) -> Option<&MuscleMapping> {
        self.muscles.get(exercise)
    }

    /// Handle type for an exercise, if configured
    #[must_use]
    pub fn handle_type_for(&self, exercise: &str) -> Option<&str> {
        self.handle_types.get(exercise).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_detailed_entries_deserialize() {
        let muscles: HashMap<String, MuscleMapping> = serde_json::from_str(
            r#"{
                "Bench Press": "Chest",
                "Row": {"primary": "Back", "secondary": "Biceps", "secondary_percent": 50}
            }"#,
        )
        .unwrap();

        assert_eq!(muscles["Bench Press"], MuscleMapping::primary("Chest"));
        assert_eq!(
            muscles["Row"].secondary_magnitude(),
            Some(("Biceps", 0.5))
        );
    }

    #[test]
    fn test_zero_percent_secondary_contributes_nothing() {
        let mapping = MuscleMapping::primary("Legs").with_secondary("Glutes", 0.0);
        assert_eq!(mapping.secondary_magnitude(), None);
    }
}
