// ABOUTME: SQLite-backed persistent detail cache with single-row versioned upserts
// ABOUTME: Stores extracted session records as JSON keyed by (user_id, session_id)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheLookup, DetailCache, StoredDetail};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liftlog_core::constants::cache::DETAIL_TABLE;
use liftlog_core::models::{SessionId, SessionRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// Pool size for file-backed databases
const FILE_POOL_CONNECTIONS: u32 = 5;

/// Detail cache persisted in a SQLite database
#[derive(Clone)]
pub struct SqliteDetailCache {
    pool: SqlitePool,
    version: u32,
}

impl SqliteDetailCache {
    /// Open (creating if needed) the database at `database_url` and ensure the schema exists
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection so every query sees the
    /// same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened, or the
    /// schema cannot be created
    pub async fn connect(database_url: &str, version: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?
            .create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_CONNECTIONS)
        };
        let pool = pool_options.connect_with(options).await?;

        let cache = Self::with_pool(pool, version);
        cache.migrate().await?;
        info!(cache.version = version, "SQLite detail cache ready");
        Ok(cache)
    }

    /// Use an existing pool; the schema must already exist (see [`Self::migrate`])
    #[must_use]
    pub const fn with_pool(pool: SqlitePool, version: u32) -> Self {
        Self { pool, version }
    }

    /// Same database, different current version
    #[must_use]
    pub fn with_version(&self, version: u32) -> Self {
        Self::with_pool(self.pool.clone(), version)
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the cache table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let ddl = format!(
            r"
            CREATE TABLE IF NOT EXISTS {DETAIL_TABLE} (
                user_id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                cache_version INTEGER NOT NULL,
                records_json TEXT NOT NULL,
                stored_at TEXT NOT NULL,
                PRIMARY KEY (user_id, session_id)
            )
            "
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create detail cache table: {e}")))?;
        Ok(())
    }

    async fn fetch_row(&self, user_id: &str, session_id: &SessionId) -> AppResult<Option<StoredDetail>> {
        let query = format!(
            r"
            SELECT user_id, session_id, cache_version, records_json, stored_at
            FROM {DETAIL_TABLE}
            WHERE user_id = ?1 AND session_id = ?2
            "
        );
        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(session_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to read cached session: {e}")))?;

        row.as_ref().map(row_to_stored).transpose()
    }
}

fn row_to_stored(row: &SqliteRow) -> AppResult<StoredDetail> {
    let version: i64 = row.try_get("cache_version")?;
    let records_json: String = row.try_get("records_json")?;
    let stored_at: String = row.try_get("stored_at")?;
    let session_id: String = row.try_get("session_id")?;

    Ok(StoredDetail {
        user_id: row.try_get("user_id")?,
        session_id: SessionId::new(session_id),
        // Unrepresentable tags can never match a current version
        cache_version: u32::try_from(version).unwrap_or(u32::MAX),
        records: serde_json::from_str(&records_json)?,
        stored_at: DateTime::parse_from_rfc3339(&stored_at)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc)),
    })
}

#[async_trait]
impl DetailCache for SqliteDetailCache {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn current_version(&self) -> u32 {
        self.version
    }

    async fn get(&self, user_id: &str, session_id: &SessionId) -> CacheLookup {
        match self.fetch_row(user_id, session_id).await {
            Ok(Some(stored)) => {
                if !stored.is_current(self.version) {
                    debug!(
                        user.id = %user_id,
                        session.id = %session_id,
                        cache.stored_version = stored.cache_version,
                        cache.version = self.version,
                        "Stale cache entry"
                    );
                }
                stored.into_lookup(self.version)
            }
            Ok(None) => CacheLookup::Miss,
            Err(e) => CacheLookup::Error(e),
        }
    }

    async fn put(
        &self,
        user_id: &str,
        session_id: &SessionId,
        records: &[SessionRecord],
    ) -> AppResult<()> {
        let records_json = serde_json::to_string(records)?;
        let statement = format!(
            r"
            INSERT INTO {DETAIL_TABLE} (user_id, session_id, cache_version, records_json, stored_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, session_id) DO UPDATE SET
                cache_version = ?3,
                records_json = ?4,
                stored_at = ?5
            "
        );
        sqlx::query(&statement)
            .bind(user_id)
            .bind(session_id.as_str())
            .bind(i64::from(self.version))
            .bind(&records_json)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to store cached session: {e}")))?;
        Ok(())
    }

    async fn inspect(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> AppResult<Option<StoredDetail>> {
        self.fetch_row(user_id, session_id).await
    }
}
