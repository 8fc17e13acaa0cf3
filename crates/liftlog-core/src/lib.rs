// ABOUTME: Core types and constants for the LiftLog exercise history engine
// ABOUTME: Foundation crate with error handling, shared models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # LiftLog Core
//!
//! Foundation crate providing shared types and constants for the exercise history
//! engine. It changes infrequently so the algorithm and provider crates can compile
//! in parallel against it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Defaults for caching, fetching, aggregation, and fatigue decay
//! - **models**: Session stubs and records, raw detail payloads, mappings, history output

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
