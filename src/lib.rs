// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Disk-resident inverted-index search engine.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌─────────────┐
//! │  text::*   │──▶│ build::*         │──▶│ search::*   │
//! │ (tokenize, │   │ (partition,      │   │ (directory  │
//! │  tag, stem)│   │  merge, split)   │   │  lookup,    │
//! └────────────┘   └──────────────────┘   │  TF-IDF,    │
//!                          │               │  cosine)    │
//!                          ▼               └─────────────┘
//!                   ┌──────────────┐
//!                   │  binary::*   │  on-disk framing shared
//!                   │ (partitions, │  by the builder and the
//!                   │  tables,     │  searcher
//!                   │  directory)  │
//!                   └──────────────┘
//! ```
//!
//! A build walks a corpus directory, tokenizes each document's HTML,
//! optionally rejects near-duplicates, and accumulates postings in memory
//! up to a fixed budget before spilling a sorted partition to disk
//! (`build::partition_builder`). Spilled partitions are k-way merged
//! (`build::merge`) and split into size-bounded final partitions plus a
//! document-frequency table and a TF-IDF vector table
//! (`build::split`). A query resolves each term to its partition via a
//! directory lookup, accumulates a TF-IDF-weighted candidate set, prunes
//! it, and ranks by cosine similarity (`search`).
//!
//! # Usage
//!
//! ```no_run
//! use strata::{build_index, Config, Searcher};
//!
//! let config = Config {
//!     source: "corpus".into(),
//!     data_dir: "data".into(),
//!     ..Config::default()
//! };
//! build_index(&config).unwrap();
//!
//! let searcher = Searcher::open(&config).unwrap();
//! let hits = searcher.search("rust systems programming", 10).unwrap();
//! ```

pub mod binary;
pub mod build;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fuzzy;
pub mod path_mapper;
pub mod scoring;
pub mod search;
pub mod state;
pub mod text;
pub mod types;

pub use build::{build_index, BuildReport};
pub use config::Config;
pub use error::{Result, StrataError};
pub use path_mapper::PathMapper;
pub use search::Searcher;
pub use state::IndexState;
pub use types::{DocId, SearchHit};
