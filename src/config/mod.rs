// ABOUTME: Configuration module for the exercise history engine
// ABOUTME: Re-exports the environment-driven EngineConfig and its settings groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable parsing
pub mod environment;

pub use environment::{ApiSettings, CacheSettings, EngineConfig, FetchSettings, HistorySettings};
