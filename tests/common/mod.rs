//! Shared test fixtures: writing a corpus of `{ "url", "content" }` records
//! and building an index from it with a `Config` tests can override.

#![allow(dead_code)]

use std::path::Path;
use strata::{build_index, BuildReport, Config};
use tempfile::TempDir;

pub fn write_record(dir: &Path, name: &str, url: &str, content: &str) {
    let record = serde_json::json!({ "url": url, "content": content });
    std::fs::write(dir.join(name), serde_json::to_string(&record).unwrap()).unwrap();
}

/// Write `docs` (url, content) as one JSON file per document and build an
/// index over them with duplicate detection disabled (tests that care about
/// deduplication enable it explicitly).
pub fn build_corpus(docs: &[(&str, &str)]) -> (TempDir, TempDir, Config, BuildReport) {
    let source = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();

    for (i, (url, content)) in docs.iter().enumerate() {
        write_record(source.path(), &format!("{i}.json"), url, content);
    }

    let config = Config {
        source: source.path().to_path_buf(),
        data_dir: data.path().to_path_buf(),
        no_duplicate_detection: true,
        ..Config::default()
    };
    let report = build_index(&config).unwrap();
    (source, data, config, report)
}
