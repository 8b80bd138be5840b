// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline orchestration: walk the corpus, tokenize, dedup, intern
//! doc_ids, run the bounded-memory external build (partition, merge,
//! split), and persist everything the searcher needs.
//!
//! The four stages correspond to the lifecycle in `crate::state`:
//! Building (partition), Merging (k-way merge), Splitting (final
//! partitions + tables), then Ready once every artifact is on disk.

pub mod merge;
pub mod partition_builder;
pub mod split;

use crate::config::Config;
use crate::dedup::DuplicateDetector;
use crate::error::{DuplicateKind, Result, StrataError};
use crate::path_mapper::PathMapper;
use crate::state::{self, IndexState};
use crate::text;
use crate::types::InputRecord;
use merge::KWayMerger;
use partition_builder::PartitionBuilder;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use walkdir::WalkDir;

/// Summary of one build run, returned to the CLI for a final report.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub documents_seen: usize,
    pub documents_indexed: usize,
    pub documents_skipped_malformed: usize,
    pub documents_skipped_duplicate: usize,
    pub documents_skipped_empty: usize,
    pub partition_files: usize,
    pub vocabulary_size: usize,
    pub elapsed_secs: f64,
}

/// Run a full build for `config`: walk `config.source`, tokenize and
/// optionally deduplicate each record, then partition/merge/split into the
/// on-disk index under `config.index_dir()`.
pub fn build_index(config: &Config) -> Result<BuildReport> {
    let started = Instant::now();

    if config.rebuild {
        state::clear(config).map_err(|source| StrataError::IoFatal {
            stage: "clearing previous index",
            source,
        })?;
    }

    let spill_dir = std::env::temp_dir().join(format!(
        "strata-spill-{}-{}",
        std::process::id(),
        config.index_name
    ));
    fs::create_dir_all(&spill_dir).map_err(|source| StrataError::IoFatal {
        stage: "creating spill directory",
        source,
    })?;

    tracing::info!(source = %config.source.display(), "build: starting (state -> building)");

    let mut builder = PartitionBuilder::new(spill_dir.clone(), config.memory_budget_bytes);
    let mut path_mapper = PathMapper::new();
    let mut detector = DuplicateDetector::new();
    let mut spill_paths: Vec<PathBuf> = Vec::new();

    let mut report = BuildReport::default();

    // Phase 1 (sequential, I/O-bound): walk the corpus in a fixed,
    // sorted order and parse each file into a record. Ordering here is
    // what makes the build reproducible, so this pass never reorders.
    let mut records: Vec<InputRecord> = Vec::new();
    for entry in WalkDir::new(&config.source)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        report.documents_seen += 1;
        let path = entry.path();

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) => {
                tracing::warn!(path = %path.display(), %source, "skipping unreadable file");
                report.documents_skipped_malformed += 1;
                continue;
            }
        };

        match serde_json::from_str::<InputRecord>(&raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), reason = %e, "skipping malformed input record");
                report.documents_skipped_malformed += 1;
            }
        }
    }

    // Phase 2 (CPU-bound, embarrassingly parallel): tokenizing one
    // document never touches another's state, so with the `parallel`
    // feature enabled this runs across rayon's thread pool. `par_iter`
    // over a `Vec` is index-ordered, so `tokenized[i]` still lines up
    // with `records[i]` regardless of which thread produced it (spec.md
    // §5: parallel tokenization is fine as long as doc_id assignment,
    // below, stays serialized).
    #[cfg(feature = "parallel")]
    let tokenized: Vec<_> = records
        .par_iter()
        .map(|record| text::tokenize_document(&record.content))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let tokenized: Vec<_> = records
        .iter()
        .map(|record| text::tokenize_document(&record.content))
        .collect();

    // Phase 3 (sequential): dedup, intern, and feed the partition builder
    // in the same fixed order phase 1 established.
    for (record, tokens) in records.iter().zip(tokenized) {
        if tokens.is_empty() {
            tracing::debug!(url = %record.url, "skipping zero-length document after tokenization");
            report.documents_skipped_empty += 1;
            continue;
        }

        if !config.no_duplicate_detection {
            let flat: Vec<String> = tokens.iter().map(|t| t.token.clone()).collect();
            if let Err(kind) = detector.check(&flat) {
                let kind_name = match kind {
                    DuplicateKind::Exact => "exact",
                    DuplicateKind::Near => "near",
                };
                tracing::debug!(url = %record.url, kind = kind_name, "skipping duplicate document");
                report.documents_skipped_duplicate += 1;
                continue;
            }
        }

        let doc_id = path_mapper.intern(&record.url);
        if let Some(spill_path) =
            builder
                .add_document(doc_id, &tokens)
                .map_err(|source| StrataError::IoFatal {
                    stage: "flushing partition builder",
                    source,
                })?
        {
            spill_paths.push(spill_path);
        }
        report.documents_indexed += 1;
    }

    if let Some(spill_path) = builder.flush().map_err(|source| StrataError::IoFatal {
        stage: "final partition builder flush",
        source,
    })? {
        spill_paths.push(spill_path);
    }

    tracing::info!(
        files = spill_paths.len(),
        "build: merging (state -> merging)"
    );
    let merger = KWayMerger::open(&spill_paths).map_err(|source| StrataError::IoFatal {
        stage: "opening intermediate partitions for merge",
        source,
    })?;

    tracing::info!("build: splitting (state -> splitting)");
    let split_report = split::split_and_finalize(
        merger,
        &config.index_dir(),
        config.partition_target_bytes,
        path_mapper.len() as u32,
    )
    .map_err(|source| StrataError::IoFatal {
        stage: "splitting merged stream into final partitions",
        source,
    })?;

    for path in &spill_paths {
        let _ = fs::remove_file(path);
    }
    let _ = fs::remove_dir(&spill_dir);

    fs::create_dir_all(config.mappers_dir()).map_err(|source| StrataError::IoFatal {
        stage: "creating mappers directory",
        source,
    })?;
    path_mapper
        .save(&config.mappers_dir().join("paths.bin"))
        .map_err(|source| StrataError::IoFatal {
            stage: "persisting path mapper",
            source,
        })?;

    report.partition_files = split_report.partition_files;
    report.vocabulary_size = split_report.vocabulary_size;
    report.elapsed_secs = started.elapsed().as_secs_f64();

    debug_assert_eq!(state::detect(config), IndexState::Ready);
    tracing::info!(
        documents = report.documents_indexed,
        vocabulary = report.vocabulary_size,
        partitions = report.partition_files,
        elapsed_secs = report.elapsed_secs,
        "build: complete (state -> ready)"
    );

    Ok(report)
}
