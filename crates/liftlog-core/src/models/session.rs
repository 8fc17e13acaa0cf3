// ABOUTME: Session identifiers, calendar stubs, and extracted per-exercise session records
// ABOUTME: SessionRecord is the immutable unit stored in the persistent detail cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Upstream identifier of one completed training session
///
/// The upstream API emits ids as JSON numbers in some payloads and strings in others;
/// both deserialize to the same canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id from its canonical string form
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_owned())
    }

    /// Borrow the canonical string form
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is usable (upstream sends `0` or `""` for plans never started)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0 != "0"
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for SessionId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self::new(s),
        })
    }
}

/// Minimal metadata for one plan listed in the training calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStub {
    /// Upstream session id
    pub session_id: SessionId,
    /// Calendar day the session is listed under
    pub date: NaiveDate,
    /// Whether the session was completed
    pub is_finished: bool,
    /// Total volume reported by the calendar listing
    pub total_capacity: f64,
    /// Finish time reported by the calendar listing, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
    /// Plan title, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SessionStub {
    /// Create a completed stub with no optional metadata
    #[must_use]
    pub fn completed(session_id: impl Into<SessionId>, date: NaiveDate) -> Self {
        Self {
            session_id: session_id.into(),
            date,
            is_finished: true,
            total_capacity: 0.0,
            finish_time: None,
            title: None,
        }
    }

    /// Attach a finish time
    #[must_use]
    pub fn with_finish_time(mut self, finish_time: DateTime<Utc>) -> Self {
        self.finish_time = Some(finish_time);
        self
    }

    /// Whether this stub refers to a completed session with a usable id
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_finished && self.session_id.is_valid()
    }
}

/// Performance of one exercise inside one completed session
///
/// Created once when a training detail payload is extracted and never mutated after;
/// completed historical sessions do not change retroactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session the exercise was performed in
    pub session_id: SessionId,
    /// Calendar day of the session
    pub date: NaiveDate,
    /// When the session finished, if known
    #[serde(default)]
    pub finish_timestamp: Option<DateTime<Utc>>,
    /// Sum of set capacities (reps x weight), in the upstream's native unit
    pub volume_kg: f64,
    /// Heaviest per-set weight, derived as capacity / reps
    pub max_weight_kg: f64,
    /// Exercise name as listed upstream
    pub exercise_name: String,
}
