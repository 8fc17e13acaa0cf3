// ABOUTME: Application constants organized by domain
// ABOUTME: Fetch, aggregation, and fatigue defaults used when no environment override is set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache defaults
pub mod cache;

/// Upstream fitness API and fetch coordinator defaults
pub mod fetch {
    /// Default upstream API base URL
    pub const DEFAULT_API_BASE_URL: &str = "https://euapi.speediance.com";

    /// Device type filter sent with calendar requests
    pub const DEVICE_TYPE: u32 = 1;

    /// Maximum number of concurrent training detail fetches
    pub const MAX_CONCURRENT_FETCHES: usize = 10;

    /// Per-fetch timeout in seconds
    pub const FETCH_TIMEOUT_SECS: u64 = 15;

    /// Connection timeout in seconds for the shared HTTP client
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Calendar months scanned when building exercise history
    pub const HISTORY_CALENDAR_MONTHS: u32 = 13;

    /// Calendar endpoint path (queried once per month)
    pub const CALENDAR_MONTH_PATH: &str = "/api/app/v5/trainingCalendar/monthNew";

    /// Completed training detail endpoint path (session id appended)
    pub const TRAINING_DETAIL_PATH: &str = "/api/app/cttTrainingInfo";

    /// Upstream envelope code meaning "ok"
    pub const UPSTREAM_OK_CODE: i64 = 0;
}

/// Aggregation defaults
pub mod aggregation {
    /// Number of most recent sessions kept in each exercise's display history
    pub const HISTORY_LIMIT: usize = 20;

    /// Exercises not performed within this many days are left out of the exercise list
    pub const ACTIVE_WINDOW_DAYS: u32 = 14;

    /// Fallback name for exercises the upstream API leaves unnamed
    pub const UNKNOWN_EXERCISE: &str = "Unknown";
}

/// Fatigue decay defaults
pub mod fatigue {
    /// Default time for a fully fatigued muscle to recover
    pub const DEFAULT_RECOVERY_HOURS: f64 = 96.0;

    /// Shortest accepted recovery time
    pub const MIN_RECOVERY_HOURS: f64 = 24.0;

    /// Longest accepted recovery time
    pub const MAX_RECOVERY_HOURS: f64 = 168.0;

    /// Fatigue magnitude of a primary-muscle event
    pub const PRIMARY_EVENT_MAGNITUDE: f64 = 1.0;

    /// Fatigue saturation ceiling
    pub const MAX_FATIGUE: f64 = 1.0;

    /// Hour of day used for exercise-days without a precise finish time
    pub const FALLBACK_EVENT_HOUR: u32 = 12;
}

/// Environment variable names read by `EngineConfig::from_env`
pub mod env_config {
    /// Persistent detail cache database URL
    pub const DATABASE_URL: &str = "LIFTLOG_DATABASE_URL";
    /// Persistent detail cache version tag
    pub const CACHE_VERSION: &str = "LIFTLOG_CACHE_VERSION";
    /// Result cache TTL in seconds
    pub const RESULT_TTL_SECS: &str = "LIFTLOG_RESULT_TTL_SECS";
    /// Result cache capacity in users
    pub const RESULT_CACHE_MAX_USERS: &str = "LIFTLOG_RESULT_CACHE_MAX_USERS";
    /// Maximum concurrent detail fetches
    pub const FETCH_CONCURRENCY: &str = "LIFTLOG_FETCH_CONCURRENCY";
    /// Per-fetch timeout in seconds
    pub const FETCH_TIMEOUT_SECS: &str = "LIFTLOG_FETCH_TIMEOUT_SECS";
    /// Calendar months scanned per aggregation
    pub const CALENDAR_MONTHS: &str = "LIFTLOG_CALENDAR_MONTHS";
    /// Sessions kept per exercise history
    pub const HISTORY_LIMIT: &str = "LIFTLOG_HISTORY_LIMIT";
    /// Active exercise window in days (0 disables)
    pub const ACTIVE_WINDOW_DAYS: &str = "LIFTLOG_ACTIVE_WINDOW_DAYS";
    /// Default recovery time in hours
    pub const RECOVERY_HOURS: &str = "LIFTLOG_RECOVERY_HOURS";
    /// Upstream API base URL
    pub const API_BASE_URL: &str = "LIFTLOG_API_BASE_URL";
    /// Upstream API token
    pub const API_TOKEN: &str = "LIFTLOG_API_TOKEN";
    /// Upstream API user id
    pub const API_USER_ID: &str = "LIFTLOG_API_USER_ID";
    /// Directory holding the mapping JSON files
    pub const MAPPING_DIR: &str = "LIFTLOG_MAPPING_DIR";
}

/// Mapping file names
pub mod mapping_files {
    /// Exercise to muscle group mapping
    pub const MUSCLE_GROUPS: &str = "muscle_groups.json";
    /// Exercise to handle type mapping
    pub const HANDLE_TYPES: &str = "handle_types.json";
    /// Default mapping directory
    pub const DEFAULT_MAPPING_DIR: &str = ".";
}

/// Service names for structured logging
pub mod service_names {
    /// Engine service name
    pub const LIFTLOG: &str = "liftlog";

    /// Upstream training API, used as the service name in external errors
    pub const TRAINING_API: &str = "training-api";

    /// Synthetic in-memory session source
    pub const SYNTHETIC: &str = "synthetic";
}
