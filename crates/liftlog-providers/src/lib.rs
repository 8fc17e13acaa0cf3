// ABOUTME: Raw training session sources for the exercise history engine
// ABOUTME: Defines the SessionSource trait with remote HTTP and synthetic implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! Session sources supply the two raw inputs of the engine: the list of completed
//! sessions in a calendar window, and the per-set detail of one session.

pub use liftlog_core::errors;
pub use liftlog_core::models;

/// Training calendar parsing
pub mod calendar;
/// Shared HTTP client for remote calls
pub mod http_client;
/// Upstream training API source
pub mod remote;
/// In-memory source for development and tests
pub mod synthetic;

use async_trait::async_trait;
use liftlog_core::errors::AppResult;
use liftlog_core::models::{SessionId, SessionStub, TrainingDetail};

pub use calendar::{completed_stubs, month_window, CalendarDay, CalendarPlan};
pub use http_client::{client_timeouts, initialize_shared_client, shared_client};
pub use remote::HttpSessionSource;
pub use synthetic::SyntheticSessionSource;

/// Raw session fetcher
///
/// Implementations must be safe to call concurrently: the fetch coordinator issues many
/// `fetch_training_detail` calls in parallel against one shared source.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Completed sessions in the `months` most recent calendar months
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar could not be loaded at all
    async fn fetch_calendar_window(&self, user_id: &str, months: u32) -> AppResult<Vec<SessionStub>>;

    /// Per-set performance data of one completed session
    ///
    /// # Errors
    ///
    /// Returns an error if the session could not be fetched or the response had no payload
    async fn fetch_training_detail(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> AppResult<TrainingDetail>;
}
