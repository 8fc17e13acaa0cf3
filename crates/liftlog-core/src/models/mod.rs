// ABOUTME: Shared data models for sessions, raw detail payloads, mappings, and history output
// ABOUTME: Used by the providers, intelligence, and engine crates alike
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Raw per-set training detail payload
pub mod detail;
/// Aggregated history output types
pub mod history;
/// Lenient serde helpers for upstream payloads
pub mod lenient;
/// Exercise mapping data
pub mod mapping;
/// Session ids, stubs, and extracted records
pub mod session;

pub use detail::{ExerciseDetail, SetDetail, TrainingDetail};
pub use history::{
    DailyVolume, DailyVolumeMap, ExerciseHistoryEntry, ExerciseHistoryReport, HistoryAggregate,
    HistoryPoint, LastTimeMap, MuscleFatigueState,
};
pub use mapping::{MappingSet, MuscleMapping};
pub use session::{SessionId, SessionRecord, SessionStub};
