// ABOUTME: Environment configuration for the exercise history engine
// ABOUTME: Parses LIFTLOG_* variables into typed cache, fetch, aggregation, and API settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration. Every setting has a default from
//! `liftlog_core::constants`, so an empty environment yields a working engine backed by
//! `sqlite:liftlog.db`.

use crate::errors::{AppError, AppResult, ErrorCode};
use liftlog_core::constants::aggregation::{ACTIVE_WINDOW_DAYS, HISTORY_LIMIT};
use liftlog_core::constants::cache::{
    DEFAULT_DATABASE_URL, DETAIL_CACHE_VERSION, RESULT_CACHE_MAX_USERS, RESULT_TTL_SECS,
};
use liftlog_core::constants::env_config;
use liftlog_core::constants::fatigue::DEFAULT_RECOVERY_HOURS;
use liftlog_core::constants::fetch::{
    DEFAULT_API_BASE_URL, FETCH_TIMEOUT_SECS, HISTORY_CALENDAR_MONTHS, MAX_CONCURRENT_FETCHES,
};
use liftlog_core::constants::mapping_files::DEFAULT_MAPPING_DIR;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Persistent detail cache location
    pub database_url: String,
    /// Version tag entries must carry to be valid
    pub detail_cache_version: u32,
    /// How long an aggregation result is reused
    pub result_ttl: Duration,
    /// Users whose results are kept in memory at once
    pub result_cache_max_users: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            detail_cache_version: DETAIL_CACHE_VERSION,
            result_ttl: Duration::from_secs(RESULT_TTL_SECS),
            result_cache_max_users: RESULT_CACHE_MAX_USERS,
        }
    }
}

/// Fetch coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Maximum detail fetches in flight
    pub max_concurrency: usize,
    /// Timeout applied to each detail fetch
    pub fetch_timeout: Duration,
    /// Calendar months scanned per aggregation
    pub calendar_months: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_concurrency: MAX_CONCURRENT_FETCHES,
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            calendar_months: HISTORY_CALENDAR_MONTHS,
        }
    }
}

/// Aggregation and fatigue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Sessions kept per exercise history
    pub history_limit: usize,
    /// Exercises idle longer than this are hidden from the list (`None` shows all)
    pub active_window_days: Option<u32>,
    /// Recovery time used when a request does not specify one
    pub default_recovery_hours: f64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            active_window_days: Some(ACTIVE_WINDOW_DAYS),
            default_recovery_hours: DEFAULT_RECOVERY_HOURS,
        }
    }
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the training API
    pub base_url: String,
    /// Session token
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Upstream user id the token belongs to
    pub user_id: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            token: None,
            user_id: None,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cache settings
    pub cache: CacheSettings,
    /// Fetch coordinator settings
    pub fetch: FetchSettings,
    /// Aggregation and fatigue settings
    pub history: HistorySettings,
    /// Upstream API settings
    pub api: ApiSettings,
    /// Directory with `muscle_groups.json` and `handle_types.json`
    pub mapping_dir: PathBuf,
}

impl EngineConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if a variable is set but cannot be parsed or is out
    /// of range
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns a `ConfigInvalid` error if a variable is set but cannot be parsed or is out
    /// of range
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = EnvLookup(lookup);

        let max_concurrency: usize =
            vars.parse_or(env_config::FETCH_CONCURRENCY, MAX_CONCURRENT_FETCHES)?;
        if max_concurrency == 0 {
            return Err(invalid(env_config::FETCH_CONCURRENCY, "must be at least 1"));
        }
        let active_window_days: u32 =
            vars.parse_or(env_config::ACTIVE_WINDOW_DAYS, ACTIVE_WINDOW_DAYS)?;
        let default_recovery_hours: f64 =
            vars.parse_or(env_config::RECOVERY_HOURS, DEFAULT_RECOVERY_HOURS)?;
        if !default_recovery_hours.is_finite() || default_recovery_hours <= 0.0 {
            return Err(invalid(env_config::RECOVERY_HOURS, "must be a positive number"));
        }

        Ok(Self {
            cache: CacheSettings {
                database_url: vars.string_or(env_config::DATABASE_URL, DEFAULT_DATABASE_URL),
                detail_cache_version: vars.parse_or(env_config::CACHE_VERSION, DETAIL_CACHE_VERSION)?,
                result_ttl: Duration::from_secs(
                    vars.parse_or(env_config::RESULT_TTL_SECS, RESULT_TTL_SECS)?,
                ),
                result_cache_max_users: vars
                    .parse_or(env_config::RESULT_CACHE_MAX_USERS, RESULT_CACHE_MAX_USERS)?,
            },
            fetch: FetchSettings {
                max_concurrency,
                fetch_timeout: Duration::from_secs(
                    vars.parse_or(env_config::FETCH_TIMEOUT_SECS, FETCH_TIMEOUT_SECS)?,
                ),
                calendar_months: vars.parse_or(env_config::CALENDAR_MONTHS, HISTORY_CALENDAR_MONTHS)?,
            },
            history: HistorySettings {
                history_limit: vars.parse_or(env_config::HISTORY_LIMIT, HISTORY_LIMIT)?,
                active_window_days: (active_window_days > 0).then_some(active_window_days),
                default_recovery_hours,
            },
            api: ApiSettings {
                base_url: vars.string_or(env_config::API_BASE_URL, DEFAULT_API_BASE_URL),
                token: vars.optional(env_config::API_TOKEN),
                user_id: vars.optional(env_config::API_USER_ID),
            },
            mapping_dir: PathBuf::from(vars.string_or(env_config::MAPPING_DIR, DEFAULT_MAPPING_DIR)),
        })
    }
}

struct EnvLookup<F>(F);

impl<F> EnvLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_owned())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e| invalid(key, &format!("'{raw}' is not valid: {e}")))
        })
    }
}

fn invalid(key: &str, reason: &str) -> AppError {
    AppError::new(ErrorCode::ConfigInvalid, format!("{key} {reason}"))
}
