// ABOUTME: Cache-related constants for the persistent detail cache and result memoization
// ABOUTME: Version tag, result TTL, and capacity defaults shared by all cache backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Current persistent detail cache version.
///
/// Bump to invalidate every stored session detail when the extraction schema changes.
/// Entries tagged with an older version are kept on disk but read as misses.
pub const DETAIL_CACHE_VERSION: u32 = 2;

/// In-memory aggregation result TTL in seconds
pub const RESULT_TTL_SECS: u64 = 300; // 5 minutes

/// Maximum number of users whose aggregation result is memoized at once
pub const RESULT_CACHE_MAX_USERS: usize = 1_000;

/// Default `SQLite` location for the persistent detail cache
pub const DEFAULT_DATABASE_URL: &str = "sqlite:liftlog.db";

/// Table holding extracted session details
pub const DETAIL_TABLE: &str = "session_details";
