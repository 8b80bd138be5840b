// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index lifecycle state machine (spec.md §4.8/§9).
//!
//! `Absent -> Building -> Merging -> Splitting -> Ready`. Readiness is
//! detected at startup by checking that every on-disk artifact a `Ready`
//! index needs is present; a forced rebuild or a fatal build error always
//! routes back to `Absent`.

use crate::config::Config;
use std::fmt;
use std::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Absent,
    Building,
    Merging,
    Splitting,
    Ready,
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexState::Absent => "absent",
            IndexState::Building => "building",
            IndexState::Merging => "merging",
            IndexState::Splitting => "splitting",
            IndexState::Ready => "ready",
        };
        write!(f, "{s}")
    }
}

/// Detect current readiness by inspecting the on-disk layout. Does not
/// itself perform any state transition; callers act on the result.
pub fn detect(config: &Config) -> IndexState {
    if config.rebuild {
        return IndexState::Absent;
    }

    let index_dir = config.index_dir();
    let ready = index_dir.join("df.bin").is_file()
        && index_dir.join("vectors.bin").is_file()
        && index_dir.join("partitions.dir").is_file()
        && config.mappers_dir().join("paths.bin").is_file();

    if ready {
        IndexState::Ready
    } else {
        IndexState::Absent
    }
}

/// Discard all persisted state for this index, returning to `Absent`. Used
/// both for `REBUILD=true` and for cleanup after a fatal build error.
pub fn clear(config: &Config) -> std::io::Result<()> {
    let index_dir = config.index_dir();
    if index_dir.is_dir() {
        fs::remove_dir_all(&index_dir)?;
    }
    let mappers_dir = config.mappers_dir();
    if mappers_dir.is_dir() {
        fs::remove_dir_all(&mappers_dir)?;
    }
    let searchers_dir = config.searchers_dir();
    if searchers_dir.is_dir() {
        fs::remove_dir_all(&searchers_dir)?;
    }
    Ok(())
}
