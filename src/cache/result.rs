// ABOUTME: Per-user in-memory memoization of aggregation results with TTL expiry
// ABOUTME: Bounded LRU over users; compute errors are never cached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use liftlog_core::constants::cache::{RESULT_CACHE_MAX_USERS, RESULT_TTL_SECS};
use lru::LruCache;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct CachedResult<T> {
    payload: Arc<T>,
    computed_at: Instant,
}

/// TTL cache of one computed payload per user
///
/// There is no single-flight: two requests arriving after expiry both recompute and the
/// last one to finish wins. The lock is never held while computing.
pub struct ResultCache<T> {
    entries: RwLock<LruCache<String, CachedResult<T>>>,
    ttl: Duration,
}

impl<T> ResultCache<T> {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(RESULT_CACHE_MAX_USERS) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    };

    /// Cache holding up to `max_users` payloads for `ttl` each
    #[must_use]
    pub fn new(ttl: Duration, max_users: usize) -> Self {
        let capacity = NonZeroUsize::new(max_users).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Time-to-live of each entry
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh payload for `user_id`, if any
    pub async fn get(&self, user_id: &str) -> Option<Arc<T>> {
        let mut entries = self.entries.write().await;
        let expired = match entries.get(user_id) {
            Some(entry) if entry.computed_at.elapsed() < self.ttl => {
                return Some(Arc::clone(&entry.payload));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(user_id);
        }
        None
    }

    /// Store a freshly computed payload
    pub async fn insert(&self, user_id: &str, payload: T) -> Arc<T> {
        let payload = Arc::new(payload);
        self.entries.write().await.put(
            user_id.to_owned(),
            CachedResult {
                payload: Arc::clone(&payload),
                computed_at: Instant::now(),
            },
        );
        payload
    }

    /// Drop the payload for `user_id`
    pub async fn invalidate(&self, user_id: &str) {
        self.entries.write().await.pop(user_id);
    }

    /// Cached payload if fresh, otherwise run `compute` and cache its success
    ///
    /// # Errors
    ///
    /// Returns the error from `compute`; nothing is cached in that case
    pub async fn get_or_compute<F, Fut>(&self, user_id: &str, compute: F) -> AppResult<Arc<T>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
    {
        if let Some(payload) = self.get(user_id).await {
            debug!(user.id = %user_id, cache.layer = "result", "Result cache hit");
            return Ok(payload);
        }
        debug!(user.id = %user_id, cache.layer = "result", "Result cache miss");
        let payload = compute().await?;
        Ok(self.insert(user_id, payload).await)
    }
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(RESULT_TTL_SECS), RESULT_CACHE_MAX_USERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let cache = ResultCache::new(Duration::from_secs(300), 10);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_compute("u1", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(*value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let cache = ResultCache::new(Duration::ZERO, 10);
        cache.insert("u1", 1).await;
        assert!(cache.get("u1").await.is_none());

        let value = cache.get_or_compute("u1", || async { Ok(2) }).await.unwrap();
        assert_eq!(*value, 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: ResultCache<u32> = ResultCache::new(Duration::from_secs(300), 10);
        let result = cache
            .get_or_compute("u1", || async { Err(AppError::upstream_unavailable("down")) })
            .await;
        assert!(result.is_err());
        assert!(cache.get("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_least_recently_used_user_is_evicted() {
        let cache = ResultCache::new(Duration::from_secs(300), 2);
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        assert!(cache.get("a").await.is_some());
        cache.insert("c", 3).await;

        assert!(cache.get("b").await.is_none());
        assert!(cache.get("a").await.is_some());
        assert!(cache.get("c").await.is_some());
    }
}
