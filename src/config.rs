//! Engine configuration persistence
//!
//! Loads [`EngineConfig`] from a JSON file. Every field is optional in the
//! file; missing fields take their defaults.
//!
//! # Error Handling
//!
//! [`EngineConfig::load`] reports unreadable or unparsable files as errors.
//! [`EngineConfig::load_optional`] never fails:
//! - No path or a missing file means defaults
//! - A load error is logged and replaced by defaults
//!
//! Command line flags are applied on top of whatever was loaded.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use move_tree::{SearchConfig, DEFAULT_SEARCH_DEPTH};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default node budget before the tree is pruned
pub const DEFAULT_MAX_NODES: usize = 2_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched below the root on `go` without a depth
    pub max_search_depth: u32,

    /// Break ties between equally scored moves at random
    pub random: bool,

    /// Search threads; `0` means one per CPU
    pub workers: usize,

    /// Tree size that triggers pruning before a search; `null` disables it
    pub max_nodes: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_search_depth: DEFAULT_SEARCH_DEPTH,
            random: false,
            workers: 1,
            max_nodes: Some(DEFAULT_MAX_NODES),
        }
    }
}

impl EngineConfig {
    /// Read and parse the JSON file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config = serde_json::from_str::<EngineConfig>(&contents)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        info!("[CONFIG] Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` when given, falling back to defaults
    pub fn load_optional(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            info!("[CONFIG] No config file found at {:?}. Using defaults.", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("[CONFIG] {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Search settings for the driver, with the tie-break seed
    pub fn search_config(&self, seed: Option<u64>) -> SearchConfig {
        SearchConfig {
            max_search_depth: self.max_search_depth.max(1),
            random: self.random,
            seed,
            workers: self.workers,
        }
    }
}
