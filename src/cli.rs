// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `strata` CLI surface: `index`, `search`, `inspect`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata", about = "Disk-resident inverted-index search engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build (or rebuild) an index from a corpus directory.
    Index {
        /// Corpus root directory.
        #[arg(long)]
        source: PathBuf,
        /// App-data root under which mappers/, indexes/, and searchers/ live.
        #[arg(long)]
        data_dir: PathBuf,
        /// Index name under data_dir/indexes/<name>/.
        #[arg(long, default_value = "index")]
        index_name: String,
        /// Discard any existing index and rebuild from scratch.
        #[arg(long)]
        rebuild: bool,
        /// Skip near-duplicate suppression.
        #[arg(long)]
        no_dedup: bool,
        /// Enable the edit-distance query fallback.
        #[arg(long)]
        spellcheck: bool,
        /// Verbose progress logging.
        #[arg(long)]
        debug: bool,
    },
    /// Run a query against an existing index.
    Search {
        /// App-data root passed to `index --data-dir`.
        #[arg(long)]
        data_dir: PathBuf,
        /// Index name under data_dir/indexes/<name>/.
        #[arg(long, default_value = "index")]
        index_name: String,
        /// Enable the edit-distance query fallback.
        #[arg(long)]
        spellcheck: bool,
        /// Query text.
        query: String,
        /// Number of hits to return.
        #[arg(short = 'k', long, default_value_t = 10)]
        limit: usize,
    },
    /// Print partition directory and index-state diagnostics.
    Inspect {
        /// App-data root passed to `index --data-dir`.
        #[arg(long)]
        data_dir: PathBuf,
        /// Index name under data_dir/indexes/<name>/.
        #[arg(long, default_value = "index")]
        index_name: String,
    },
}
