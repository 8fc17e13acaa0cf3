// ABOUTME: Cache command for liftlog-cli
// ABOUTME: Prints the persisted detail entry of one session together with its version status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use liftlog::cache::sqlite::SqliteDetailCache;
use liftlog::cache::DetailCache;
use liftlog::config::EngineConfig;
use liftlog::models::SessionId;
use serde_json::json;

/// Print the stored entry for `(user_id, session)`
pub async fn inspect(config: &EngineConfig, user_id: &str, session: &str) -> Result<()> {
    let version = config.cache.detail_cache_version;
    let cache = SqliteDetailCache::connect(&config.cache.database_url, version).await?;
    let session_id = SessionId::new(session);

    let output = match cache.inspect(user_id, &session_id).await? {
        Some(stored) => json!({
            "current": stored.is_current(version),
            "current_version": version,
            "entry": stored,
        }),
        None => json!({
            "current": false,
            "current_version": version,
            "entry": null,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
