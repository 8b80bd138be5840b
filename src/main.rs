// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Strata CLI: build, search, and inspect disk-resident inverted indexes.
//!
//! ```bash
//! # Build an index from a corpus of { "url": ..., "content": ... } JSON files
//! strata index --source ./corpus --data-dir ./data
//!
//! # Search it
//! strata search --data-dir ./data "rust systems programming" -k 5
//!
//! # Inspect partition layout and index state
//! strata inspect --data-dir ./data
//! ```

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use strata::{build_index, Config, IndexState, Searcher};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            source,
            data_dir,
            index_name,
            rebuild,
            no_dedup,
            spellcheck,
            debug,
        } => {
            init_tracing(debug);
            let config = Config {
                source,
                data_dir,
                index_name,
                rebuild,
                no_duplicate_detection: no_dedup,
                use_spellcheck: spellcheck,
                debug,
                ..Config::default()
            };
            run_index(&config)
        }
        Commands::Search {
            data_dir,
            index_name,
            spellcheck,
            query,
            limit,
        } => {
            init_tracing(false);
            let config = Config {
                data_dir,
                index_name,
                use_spellcheck: spellcheck,
                ..Config::default()
            };
            run_search(&config, &query, limit)
        }
        Commands::Inspect {
            data_dir,
            index_name,
        } => {
            init_tracing(false);
            let config = Config {
                data_dir,
                index_name,
                ..Config::default()
            };
            run_inspect(&config)
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .try_init();
}

fn run_index(config: &Config) -> anyhow::Result<()> {
    #[cfg(feature = "parallel")]
    let spinner = {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap());
        pb.set_message(format!("indexing {}...", config.source.display()));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    };

    let report = build_index(config).context("build failed")?;

    #[cfg(feature = "parallel")]
    spinner.finish_with_message(format!(
        "indexed {} documents ({} skipped, {} duplicates, {} empty) in {:.2}s",
        report.documents_indexed,
        report.documents_skipped_malformed,
        report.documents_skipped_duplicate,
        report.documents_skipped_empty,
        report.elapsed_secs
    ));

    println!(
        "documents: {} indexed, {} skipped (malformed), {} skipped (duplicate), {} skipped (empty)",
        report.documents_indexed,
        report.documents_skipped_malformed,
        report.documents_skipped_duplicate,
        report.documents_skipped_empty
    );
    println!(
        "vocabulary: {} terms across {} partitions",
        report.vocabulary_size, report.partition_files
    );
    println!("elapsed: {:.2}s", report.elapsed_secs);
    Ok(())
}

fn run_search(config: &Config, query: &str, limit: usize) -> anyhow::Result<()> {
    let searcher = Searcher::open(config).context("failed to open index; has it been built?")?;
    let hits = searcher.search(query, limit).context("search failed")?;

    if hits.is_empty() {
        println!("no results for {query:?}");
        return Ok(());
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>2}. {:.4}  {}", rank + 1, hit.score, hit.url);
    }
    Ok(())
}

fn run_inspect(config: &Config) -> anyhow::Result<()> {
    let state = strata::state::detect(config);
    println!("index: {}", config.index_dir().display());
    println!("state: {state}");

    if state != IndexState::Ready {
        return Ok(());
    }

    let directory = strata::binary::read_directory(&config.index_dir().join("partitions.dir"))
        .context("reading partition directory")?;
    let searcher = Searcher::open(config).context("opening index")?;

    println!("documents: {}", searcher.document_count());
    println!("vocabulary: {}", searcher.vocabulary_size());
    println!("partitions: {}", directory.len());
    for entry in &directory {
        println!("  {:<32} >= {:?}", entry.file_name, entry.smallest_token);
    }
    Ok(())
}
