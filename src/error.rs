// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Named error kinds for the build and query paths.
//!
//! Per-document errors (`InputMalformed`, `Tokenization`, `Duplicate`,
//! `IoTransient`) are confined to that document by the caller; they never
//! unwind past the build driver. Only `IoFatal` and `CorruptIndex` abort a
//! build outright.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrataError {
    #[error("malformed input record in {path}: {reason}")]
    InputMalformed { path: PathBuf, reason: String },

    #[error("tokenization dropped document {url}: {reason}")]
    Tokenization { url: String, reason: String },

    #[error("duplicate document {url} ({kind})")]
    Duplicate { url: String, kind: DuplicateKind },

    #[error("transient read failure on {path}: {source}")]
    IoTransient {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fatal I/O failure during {stage}: {source}")]
    IoFatal {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Exact,
    Near,
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKind::Exact => write!(f, "exact"),
            DuplicateKind::Near => write!(f, "near"),
        }
    }
}

pub type Result<T> = std::result::Result<T, StrataError>;
