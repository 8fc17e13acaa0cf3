// ABOUTME: Exercise history pipeline: parallel fetch coordination and the history service
// ABOUTME: Combines session sources, caches, and the aggregation and fatigue algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Parallel fetch coordinator
pub mod coordinator;
/// Exercise history service
pub mod service;

pub use coordinator::{FetchCoordinator, FetchOutcome, FetchStats};
pub use service::{Clock, ExerciseHistoryService, FixedClock, SystemClock};
