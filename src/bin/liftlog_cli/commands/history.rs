// ABOUTME: History command for liftlog-cli
// ABOUTME: Wires a session source, caches, and mappings into the service and prints the report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Context, Result};
use chrono::Utc;
use liftlog::cache::memory::InMemoryDetailCache;
use liftlog::cache::sqlite::SqliteDetailCache;
use liftlog::cache::DetailCache;
use liftlog::config::EngineConfig;
use liftlog::constants::fetch::CONNECT_TIMEOUT_SECS;
use liftlog::history::ExerciseHistoryService;
use liftlog::mapping::{JsonFileMappingProvider, MappingProvider, StaticMappingProvider};
use liftlog::models::MuscleMapping;
use liftlog::providers::{
    initialize_shared_client, HttpSessionSource, SessionSource, SyntheticSessionSource,
};
use std::sync::Arc;
use tracing::info;

/// Build and print the exercise history report
pub async fn run(
    config: &EngineConfig,
    user: Option<String>,
    recovery_hours: Option<f64>,
    synthetic: bool,
) -> Result<()> {
    let Some(user_id) = user.or_else(|| config.api.user_id.clone()) else {
        bail!("no user given: pass --user or set LIFTLOG_API_USER_ID");
    };

    let (source, detail_cache, mappings) = if synthetic {
        synthetic_stack(config)
    } else {
        upstream_stack(config).await?
    };
    info!(
        user.id = %user_id,
        source = source.name(),
        cache.backend = detail_cache.backend_name(),
        "Building exercise history"
    );

    let service = ExerciseHistoryService::from_config(config, source, detail_cache, mappings);
    let recovery_hours = recovery_hours.unwrap_or_else(|| service.default_recovery_hours());
    let report = service
        .get_exercise_history(&user_id, recovery_hours)
        .await
        .context("could not load exercise history")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

type Stack = (
    Arc<dyn SessionSource>,
    Arc<dyn DetailCache>,
    Arc<dyn MappingProvider>,
);

async fn upstream_stack(config: &EngineConfig) -> Result<Stack> {
    let Some(token) = config.api.token.clone() else {
        bail!("LIFTLOG_API_TOKEN is required unless --synthetic is used");
    };
    initialize_shared_client(config.fetch.fetch_timeout.as_secs().max(1), CONNECT_TIMEOUT_SECS);
    let cache = SqliteDetailCache::connect(
        &config.cache.database_url,
        config.cache.detail_cache_version,
    )
    .await?;

    Ok((
        Arc::new(HttpSessionSource::new(config.api.base_url.clone(), token)),
        Arc::new(cache),
        Arc::new(JsonFileMappingProvider::new(config.mapping_dir.clone())),
    ))
}

fn synthetic_stack(config: &EngineConfig) -> Stack {
    let today = Utc::now().date_naive();
    (
        Arc::new(SyntheticSessionSource::demo(today)),
        Arc::new(InMemoryDetailCache::new(config.cache.detail_cache_version)),
        Arc::new(demo_mappings()),
    )
}

fn demo_mappings() -> StaticMappingProvider {
    StaticMappingProvider::from_muscles([
        ("Back Squat", MuscleMapping::primary("Quadriceps").with_secondary("Glutes", 50.0)),
        (
            "Romanian Deadlift",
            MuscleMapping::primary("Hamstrings").with_secondary("Glutes", 40.0),
        ),
        ("Bench Press", MuscleMapping::primary("Chest").with_secondary("Triceps", 40.0)),
        ("Seated Row", MuscleMapping::primary("Back").with_secondary("Biceps", 30.0)),
        ("Biceps Curl", MuscleMapping::primary("Biceps")),
        (
            "Overhead Press",
            MuscleMapping::primary("Shoulders").with_secondary("Triceps", 40.0),
        ),
        ("Lat Pulldown", MuscleMapping::primary("Back").with_secondary("Biceps", 30.0)),
    ])
}
