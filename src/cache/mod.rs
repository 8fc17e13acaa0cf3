// ABOUTME: Cache layer for the exercise history engine
// ABOUTME: Versioned persistent detail cache trait with SQLite and in-memory backends, plus the TTL result cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Caching
//!
//! Two layers sit between the engine and the upstream API:
//!
//! - the **persistent detail cache** ([`DetailCache`]) stores extracted records per
//!   `(user, session)` forever. Completed sessions never change upstream, so an entry
//!   written under the current cache version stays valid until the version is bumped.
//!   Stale entries are not deleted; a read simply reports them as a miss and the next
//!   `put` overwrites them.
//! - the **result cache** ([`result::ResultCache`]) memoizes the full aggregation per
//!   user for a few minutes so repeated page loads skip the calendar round-trip.
//!
//! Cache failures must never fail a request: lookups return [`CacheLookup::Error`], which
//! callers treat as a miss after logging.
//!
//! ```rust,no_run
//! use liftlog::cache::{memory::InMemoryDetailCache, CacheLookup, DetailCache};
//! use liftlog::models::SessionId;
//! # async fn example() -> Result<(), liftlog::errors::AppError> {
//! let cache = InMemoryDetailCache::new(2);
//! let session = SessionId::new("81234");
//! cache.put("user-1", &session, &[]).await?;
//! assert!(matches!(cache.get("user-1", &session).await, CacheLookup::Hit(_)));
//!
//! cache.bump_version();
//! assert!(matches!(cache.get("user-1", &session).await, CacheLookup::Miss));
//! # Ok(())
//! # }
//! ```

/// In-memory detail cache backend
pub mod memory;
/// Per-user TTL result cache
pub mod result;
/// SQLite detail cache backend
pub mod sqlite;

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liftlog_core::models::{SessionId, SessionRecord};
use serde::{Deserialize, Serialize};

/// Outcome of a persistent cache read
#[derive(Debug)]
pub enum CacheLookup {
    /// Entry present under the current version
    Hit(Vec<SessionRecord>),
    /// No entry, or only a stale one
    Miss,
    /// The backend failed; callers treat this as a miss
    Error(AppError),
}

impl CacheLookup {
    /// Records if this is a hit
    #[must_use]
    pub fn into_hit(self) -> Option<Vec<SessionRecord>> {
        match self {
            Self::Hit(records) => Some(records),
            Self::Miss | Self::Error(_) => None,
        }
    }
}

/// One stored row of the persistent cache, regardless of version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDetail {
    /// Owner of the session
    pub user_id: String,
    /// Cached session
    pub session_id: SessionId,
    /// Version tag the entry was written under
    pub cache_version: u32,
    /// Extracted records
    pub records: Vec<SessionRecord>,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

impl StoredDetail {
    /// Whether the entry was written under `version`
    #[must_use]
    pub const fn is_current(&self, version: u32) -> bool {
        self.cache_version == version
    }

    /// Turn a stored row into a lookup result for the given current version
    #[must_use]
    pub fn into_lookup(self, version: u32) -> CacheLookup {
        if self.is_current(version) {
            CacheLookup::Hit(self.records)
        } else {
            CacheLookup::Miss
        }
    }
}

/// Durable store of extracted session records keyed by `(user, session)`
#[async_trait]
pub trait DetailCache: Send + Sync {
    /// Backend name for logging
    fn backend_name(&self) -> &'static str;

    /// Version tag that entries must carry to count as hits
    fn current_version(&self) -> u32;

    /// Read the records for a session
    async fn get(&self, user_id: &str, session_id: &SessionId) -> CacheLookup;

    /// Store the records for a session under the current version
    ///
    /// Durable before returning. Writing the same session twice leaves one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not persist the entry
    async fn put(
        &self,
        user_id: &str,
        session_id: &SessionId,
        records: &[SessionRecord],
    ) -> AppResult<()>;

    /// Raw stored entry for a session, whatever its version
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be read
    async fn inspect(&self, user_id: &str, session_id: &SessionId)
        -> AppResult<Option<StoredDetail>>;
}
