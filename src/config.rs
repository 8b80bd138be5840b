// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typed configuration bundle.
//!
//! Mirrors spec.md §6's recognized options, replacing what the original
//! system models as a dynamically-typed options dict. `memory_budget_bytes`
//! is an addition: the partition builder's flush threshold (spec.md §4.4)
//! needs a concrete, testable knob and spec.md leaves its exact value
//! unspecified.

use std::path::PathBuf;

/// Default flush threshold for the partition builder: ~64 MiB of estimated
/// posting-entry weight before a spill.
pub const DEFAULT_MEMORY_BUDGET_BYTES: usize = 64 * 1024 * 1024;

/// Default target size (bytes) for a final partition file (spec.md §4.6).
pub const DEFAULT_PARTITION_TARGET_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Discard existing index and rebuild from scratch.
    pub rebuild: bool,
    /// Corpus root directory.
    pub source: PathBuf,
    /// App-data root under which `mappers/`, `indexes/<name>/`, and
    /// `searchers/` live (spec.md §6).
    pub data_dir: PathBuf,
    /// Name of the index under `indexes/<name>/`.
    pub index_name: String,
    /// Skip the duplicate-detection stage entirely when true.
    pub no_duplicate_detection: bool,
    /// Enable edit-distance fallback on zero-hit queries.
    pub use_spellcheck: bool,
    /// Verbose progress logging.
    pub debug: bool,
    /// Partition builder flush threshold, in estimated bytes.
    pub memory_budget_bytes: usize,
    /// Target size for a final partition file before starting a new one.
    pub partition_target_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rebuild: false,
            source: PathBuf::from("developer"),
            data_dir: PathBuf::from("."),
            index_name: "index".to_string(),
            no_duplicate_detection: true,
            use_spellcheck: false,
            debug: false,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
            partition_target_bytes: DEFAULT_PARTITION_TARGET_BYTES,
        }
    }
}

impl Config {
    pub fn mappers_dir(&self) -> PathBuf {
        self.data_dir.join("mappers")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("indexes").join(&self.index_name)
    }

    pub fn searchers_dir(&self) -> PathBuf {
        self.data_dir.join("searchers")
    }
}
