// ABOUTME: Training calendar payload parsing into completed session stubs
// ABOUTME: Also computes the YYYY-MM month keys covering a lookback window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use liftlog_core::models::lenient::{f64_or_zero, flag, parse_date, timestamp, trimmed_string};
use liftlog_core::models::{SessionId, SessionStub};
use serde::Deserialize;
use tracing::trace;

/// One day of the monthly training calendar
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// Day in `YYYY-MM-DD` form
    #[serde(default)]
    pub date: String,
    /// Plans scheduled or performed that day
    #[serde(default)]
    pub training_plan_list: Option<Vec<CalendarPlan>>,
}

/// One plan listed under a calendar day
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPlan {
    /// Id of the performed session; absent for plans never started
    #[serde(default)]
    pub training_id: Option<SessionId>,
    /// Completion flag (`1` when finished)
    #[serde(default, deserialize_with = "flag")]
    pub is_finish: bool,
    /// Volume total shown in the calendar
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub total_capacity: f64,
    /// When the session was finished
    #[serde(default, deserialize_with = "timestamp")]
    pub finish_time: Option<DateTime<Utc>>,
    /// Plan title
    #[serde(default, deserialize_with = "trimmed_string")]
    pub title: Option<String>,
}

impl CalendarPlan {
    fn into_stub(self, date: NaiveDate) -> Option<SessionStub> {
        let session_id = self.training_id?;
        Some(SessionStub {
            session_id,
            date,
            is_finished: self.is_finish,
            total_capacity: self.total_capacity,
            finish_time: self.finish_time,
            title: self.title,
        })
    }
}

/// Collect the completed sessions listed in calendar days
///
/// Days with an unreadable date and plans that were not finished or carry no usable id
/// are skipped.
#[must_use]
pub fn completed_stubs(days: Vec<CalendarDay>) -> Vec<SessionStub> {
    let mut stubs = Vec::new();
    for day in days {
        let Some(date) = parse_date(&day.date) else {
            trace!(raw_date = %day.date, "Skipping calendar day with unreadable date");
            continue;
        };
        stubs.extend(
            day.training_plan_list
                .unwrap_or_default()
                .into_iter()
                .filter_map(|plan| plan.into_stub(date))
                .filter(SessionStub::is_completed),
        );
    }
    stubs
}

/// Month keys (`YYYY-MM`) for the `months` most recent months ending with `today`'s month,
/// newest first
#[must_use]
pub fn month_window(today: NaiveDate, months: u32) -> Vec<String> {
    let current = i64::from(today.year()) * 12 + i64::from(today.month0());
    (0..i64::from(months))
        .map(|back| {
            let index = current - back;
            let year = index.div_euclid(12);
            let month = index.rem_euclid(12) + 1;
            format!("{year:04}-{month:02}")
        })
        .collect()
}
