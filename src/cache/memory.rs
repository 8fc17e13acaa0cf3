// ABOUTME: In-memory persistent detail cache backend for tests and ephemeral runs
// ABOUTME: DashMap storage with a version tag that can be bumped at runtime
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheLookup, DetailCache, StoredDetail};
use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use liftlog_core::models::{SessionId, SessionRecord};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

/// Detail cache held in process memory
///
/// Same version semantics as the SQLite backend, but entries are lost on exit.
#[derive(Debug)]
pub struct InMemoryDetailCache {
    entries: DashMap<(String, SessionId), StoredDetail>,
    version: AtomicU32,
}

impl InMemoryDetailCache {
    /// Empty cache at `version`
    #[must_use]
    pub fn new(version: u32) -> Self {
        Self {
            entries: DashMap::new(),
            version: AtomicU32::new(version),
        }
    }

    /// Invalidate every entry by moving to the next version, returning it
    pub fn bump_version(&self) -> u32 {
        let next = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(cache.version = next, "Detail cache version bumped");
        next
    }

    /// Number of stored entries, stale ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DetailCache for InMemoryDetailCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn current_version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    async fn get(&self, user_id: &str, session_id: &SessionId) -> CacheLookup {
        let key = (user_id.to_owned(), session_id.clone());
        self.entries.get(&key).map_or(CacheLookup::Miss, |entry| {
            entry.value().clone().into_lookup(self.current_version())
        })
    }

    async fn put(
        &self,
        user_id: &str,
        session_id: &SessionId,
        records: &[SessionRecord],
    ) -> AppResult<()> {
        let stored = StoredDetail {
            user_id: user_id.to_owned(),
            session_id: session_id.clone(),
            cache_version: self.current_version(),
            records: records.to_vec(),
            stored_at: Utc::now(),
        };
        self.entries
            .insert((user_id.to_owned(), session_id.clone()), stored);
        Ok(())
    }

    async fn inspect(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> AppResult<Option<StoredDetail>> {
        let key = (user_id.to_owned(), session_id.clone());
        Ok(self.entries.get(&key).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_are_isolated_per_user() {
        let cache = InMemoryDetailCache::new(2);
        let session = SessionId::new("5");
        cache.put("alice", &session, &[]).await.unwrap();

        assert!(matches!(cache.get("alice", &session).await, CacheLookup::Hit(_)));
        assert!(matches!(cache.get("bob", &session).await, CacheLookup::Miss));
    }

    #[tokio::test]
    async fn test_stale_entry_stays_inspectable_until_rewritten() {
        let cache = InMemoryDetailCache::new(2);
        let session = SessionId::new("5");
        cache.put("alice", &session, &[]).await.unwrap();
        assert_eq!(cache.bump_version(), 3);

        assert!(matches!(cache.get("alice", &session).await, CacheLookup::Miss));
        let stale = cache.inspect("alice", &session).await.unwrap().unwrap();
        assert_eq!(stale.cache_version, 2);

        cache.put("alice", &session, &[]).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert!(matches!(cache.get("alice", &session).await, CacheLookup::Hit(_)));
    }
}
