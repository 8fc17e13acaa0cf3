// ABOUTME: Mapping providers supplying exercise-to-muscle and exercise-to-handle data
// ABOUTME: JSON-file backed provider and a static provider for tests and embedding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use liftlog_core::constants::mapping_files::{HANDLE_TYPES, MUSCLE_GROUPS};
use liftlog_core::models::{MappingSet, MuscleMapping};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Read-only source of mapping data
#[async_trait]
pub trait MappingProvider: Send + Sync {
    /// Mapping data for `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if mapping data exists but cannot be read or parsed
    async fn get_mapping(&self, user_id: &str) -> AppResult<MappingSet>;
}

/// Provider returning a fixed mapping for every user
#[derive(Debug, Clone, Default)]
pub struct StaticMappingProvider {
    mapping: MappingSet,
}

impl StaticMappingProvider {
    /// Provider serving `mapping`
    #[must_use]
    pub const fn new(mapping: MappingSet) -> Self {
        Self { mapping }
    }

    /// Provider built from `(exercise, muscles)` pairs with no handle types
    #[must_use]
    pub fn from_muscles<I, S>(muscles: I) -> Self
    where
        I: IntoIterator<Item = (S, MuscleMapping)>,
        S: Into<String>,
    {
        Self::new(MappingSet {
            muscles: muscles
                .into_iter()
                .map(|(exercise, mapping)| (exercise.into(), mapping))
                .collect(),
            handle_types: HashMap::new(),
        })
    }
}

#[async_trait]
impl MappingProvider for StaticMappingProvider {
    async fn get_mapping(&self, _user_id: &str) -> AppResult<MappingSet> {
        Ok(self.mapping.clone())
    }
}

/// Provider reading `muscle_groups.json` and `handle_types.json` from a directory
///
/// Both files are shared by all users. A missing file means "no mappings"; a file that
/// exists but does not parse is an error.
#[derive(Debug, Clone)]
pub struct JsonFileMappingProvider {
    dir: PathBuf,
}

impl JsonFileMappingProvider {
    /// Provider reading from `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the mapping files are read from
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

async fn read_json_map<T>(path: &Path) -> AppResult<HashMap<String, T>>
where
    T: DeserializeOwned,
{
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Mapping file not found, using empty mapping");
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(AppError::storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))
            .with_source(e))
        }
    };
    serde_json::from_str(&raw).map_err(|e| {
        AppError::invalid_input(format!("Malformed mapping file {}: {e}", path.display()))
            .with_source(e)
    })
}

#[async_trait]
impl MappingProvider for JsonFileMappingProvider {
    async fn get_mapping(&self, _user_id: &str) -> AppResult<MappingSet> {
        let muscles = read_json_map(&self.dir.join(MUSCLE_GROUPS)).await?;
        let handle_types = read_json_map(&self.dir.join(HANDLE_TYPES)).await?;
        Ok(MappingSet {
            muscles,
            handle_types,
        })
    }
}
