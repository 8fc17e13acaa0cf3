// ABOUTME: Main library entry point for the LiftLog exercise history engine
// ABOUTME: Two-layer caching, parallel session fetching, volume aggregation, and muscle fatigue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # LiftLog
//!
//! Turns a user's completed strength-training sessions from a remote fitness API into
//! volume history and a per-muscle fatigue estimate.
//!
//! ## Architecture
//!
//! - **Session sources** (`liftlog-providers`): training calendar and per-session detail
//! - **Persistent detail cache** ([`cache`]): versioned, permanent store of extracted
//!   session records, so completed sessions are fetched once
//! - **Fetch coordinator** ([`history::coordinator`]): bounded-parallel fetching of
//!   cache misses with per-session failure isolation
//! - **Aggregation and fatigue** (`liftlog-intelligence`): pure algorithms
//! - **Result cache** ([`cache::result`]): short-lived per-user memoization
//!
//! ## Example
//!
//! ```rust,no_run
//! use liftlog::cache::memory::InMemoryDetailCache;
//! use liftlog::config::EngineConfig;
//! use liftlog::history::ExerciseHistoryService;
//! use liftlog::mapping::StaticMappingProvider;
//! use liftlog::providers::SyntheticSessionSource;
//! use std::sync::Arc;
//! # async fn example() -> Result<(), liftlog::errors::AppError> {
//! let config = EngineConfig::from_env()?;
//! let service = ExerciseHistoryService::from_config(
//!     &config,
//!     Arc::new(SyntheticSessionSource::demo(chrono::Utc::now().date_naive())),
//!     Arc::new(InMemoryDetailCache::new(config.cache.detail_cache_version)),
//!     Arc::new(StaticMappingProvider::default()),
//! );
//! let report = service.get_exercise_history("demo-user", 96.0).await?;
//! println!("{} exercises", report.exercises.len());
//! # Ok(())
//! # }
//! ```

/// Persistent detail cache and result cache
pub mod cache;
/// Environment configuration
pub mod config;
/// Error types
pub mod errors;
/// Fetch coordination and the exercise history service
pub mod history;
/// Structured logging setup
pub mod logging;
/// Exercise mapping providers
pub mod mapping;

pub use liftlog_core::constants;
pub use liftlog_core::models;
pub use liftlog_intelligence as intelligence;
pub use liftlog_providers as providers;
