// ABOUTME: Error types for the exercise history engine
// ABOUTME: Re-exports the shared AppError taxonomy from liftlog-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Errors are defined once in `liftlog-core` so the providers, algorithms, and engine
//! share one `AppError` type and `?` works across crate boundaries.

pub use liftlog_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
