// ABOUTME: Parallel fetch coordinator resolving session stubs into records via cache or upstream
// ABOUTME: Deduplicates, partitions hits and misses, and fetches misses with bounded parallelism
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Parallel Fetch Coordinator
//!
//! Scatter/gather over cache misses:
//!
//! 1. stubs are deduplicated by session id (first listing wins)
//! 2. each stub is looked up in the persistent detail cache; backend errors count as misses
//! 3. each miss is fetched by its own task, at most `max_concurrency` at once, each bounded
//!    by `fetch_timeout`; successful fetches are extracted and written to the cache
//! 4. every task is joined before returning
//!
//! A failed fetch only loses its own session for this run. Nothing is cached for it, so
//! the next aggregation retries.

use crate::cache::{CacheLookup, DetailCache};
use crate::config::FetchSettings;
use liftlog_core::models::{SessionId, SessionRecord, SessionStub};
use liftlog_intelligence::extract_session_records;
use liftlog_providers::SessionSource;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Counters describing one coordinator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Sessions served from the persistent cache
    pub hits: usize,
    /// Sessions fetched from upstream successfully
    pub fetched: usize,
    /// Sessions whose fetch failed or timed out
    pub failed: usize,
}

/// Records per session plus run counters
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Extracted records of every resolved session
    pub records: HashMap<SessionId, Vec<SessionRecord>>,
    /// Run counters
    pub stats: FetchStats,
}

impl FetchOutcome {
    /// All records, in no particular order
    #[must_use]
    pub fn into_records(self) -> Vec<SessionRecord> {
        self.records.into_values().flatten().collect()
    }
}

/// Resolves completed sessions to records through the cache, fetching misses in parallel
#[derive(Clone)]
pub struct FetchCoordinator {
    source: Arc<dyn SessionSource>,
    cache: Arc<dyn DetailCache>,
    max_concurrency: usize,
    fetch_timeout: Duration,
}

impl FetchCoordinator {
    /// Coordinator fetching from `source` and caching into `cache`
    #[must_use]
    pub fn new(
        source: Arc<dyn SessionSource>,
        cache: Arc<dyn DetailCache>,
        settings: &FetchSettings,
    ) -> Self {
        Self {
            source,
            cache,
            max_concurrency: settings.max_concurrency.max(1),
            fetch_timeout: settings.fetch_timeout,
        }
    }

    /// Resolve every completed stub to its records
    pub async fn collect(&self, user_id: &str, stubs: &[SessionStub]) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        let misses = self.partition(user_id, stubs, &mut outcome).await;

        if !misses.is_empty() {
            debug!(
                user.id = %user_id,
                cache.misses = misses.len(),
                fetch.max_concurrency = self.max_concurrency,
                "Fetching uncached sessions"
            );
        }

        for handle in self.dispatch(user_id, misses).await {
            match handle.await {
                Ok((session_id, Some(records))) => {
                    outcome.stats.fetched += 1;
                    outcome.records.insert(session_id, records);
                }
                Ok((_, None)) => outcome.stats.failed += 1,
                Err(e) => {
                    warn!(user.id = %user_id, error = %e, "Fetch task aborted");
                    outcome.stats.failed += 1;
                }
            }
        }

        info!(
            user.id = %user_id,
            cache.backend = self.cache.backend_name(),
            cache.hits = outcome.stats.hits,
            fetch.fetched = outcome.stats.fetched,
            fetch.failed = outcome.stats.failed,
            "Session records collected"
        );
        outcome
    }

    /// Deduplicate and split stubs into cache hits (recorded in `outcome`) and misses
    async fn partition(
        &self,
        user_id: &str,
        stubs: &[SessionStub],
        outcome: &mut FetchOutcome,
    ) -> Vec<SessionStub> {
        let mut seen = HashSet::new();
        let mut misses = Vec::new();

        for stub in stubs.iter().filter(|stub| stub.is_completed()) {
            if !seen.insert(stub.session_id.clone()) {
                continue;
            }
            match self.cache.get(user_id, &stub.session_id).await {
                CacheLookup::Hit(records) => {
                    outcome.stats.hits += 1;
                    outcome.records.insert(stub.session_id.clone(), records);
                }
                CacheLookup::Miss => misses.push(stub.clone()),
                CacheLookup::Error(e) => {
                    warn!(
                        user.id = %user_id,
                        session.id = %stub.session_id,
                        error = %e,
                        "Detail cache read failed, treating as miss"
                    );
                    misses.push(stub.clone());
                }
            }
        }
        misses
    }

    /// Spawn one bounded fetch task per miss
    async fn dispatch(
        &self,
        user_id: &str,
        misses: Vec<SessionStub>,
    ) -> Vec<JoinHandle<(SessionId, Option<Vec<SessionRecord>>)>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(misses.len());

        for stub in misses {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                warn!(user.id = %user_id, "Fetch semaphore closed, skipping remaining sessions");
                break;
            };
            let worker = self.clone();
            let user_id = user_id.to_owned();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let records = worker.fetch_one(&user_id, &stub).await;
                (stub.session_id, records)
            }));
        }
        handles
    }

    /// Fetch, extract, and cache one session; `None` on failure
    async fn fetch_one(&self, user_id: &str, stub: &SessionStub) -> Option<Vec<SessionRecord>> {
        let fetched = timeout(
            self.fetch_timeout,
            self.source.fetch_training_detail(user_id, &stub.session_id),
        )
        .await;

        let detail = match fetched {
            Ok(Ok(detail)) => detail,
            Ok(Err(e)) => {
                warn!(
                    user.id = %user_id,
                    session.id = %stub.session_id,
                    source = self.source.name(),
                    error = %e,
                    "Session detail fetch failed"
                );
                return None;
            }
            Err(_) => {
                warn!(
                    user.id = %user_id,
                    session.id = %stub.session_id,
                    fetch.timeout_secs = self.fetch_timeout.as_secs(),
                    "Session detail fetch timed out"
                );
                return None;
            }
        };

        let records = extract_session_records(stub, &detail);
        if let Err(e) = self.cache.put(user_id, &stub.session_id, &records).await {
            warn!(
                user.id = %user_id,
                session.id = %stub.session_id,
                error = %e,
                "Failed to persist session detail"
            );
        }
        Some(records)
    }
}
