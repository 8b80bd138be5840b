//! End-to-end scenarios from spec.md §8, run against the public
//! `build_index`/`Searcher` surface rather than internal module APIs.

mod common;

use common::{build_corpus, write_record};
use strata::{build_index, Config, PathMapper, Searcher};

#[test]
fn scenario_1_ranks_by_shared_terms_then_tf_idf_with_doc_id_tiebreak() {
    let (_source, _data, config, _report) = build_corpus(&[
        ("https://ex.com/0", "the quick brown fox"),
        ("https://ex.com/1", "quick brown dogs"),
        ("https://ex.com/2", "lazy fox"),
    ]);

    let searcher = Searcher::open(&config).unwrap();
    let hits = searcher.search("quick fox", 10).unwrap();

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].url, "https://ex.com/0"); // both query terms
    // "lazy fox" has one other token sharing df=2 with "fox"; "quick brown
    // dogs" has two other tokens, diluting its cosine similarity further.
    assert_eq!(hits[1].url, "https://ex.com/2");
    assert_eq!(hits[2].url, "https://ex.com/1");
}

#[test]
fn scenario_2_unknown_term_returns_empty_not_error() {
    let (_source, _data, config, _report) =
        build_corpus(&[("https://ex.com/0", "the quick brown fox")]);

    let searcher = Searcher::open(&config).unwrap();
    let hits = searcher.search("nonexistentterm", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn scenario_3_stop_word_only_query_is_empty_after_tokenization() {
    let (_source, _data, config, _report) =
        build_corpus(&[("https://ex.com/0", "the quick brown fox")]);

    let searcher = Searcher::open(&config).unwrap();
    let hits = searcher.search("a", 10).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn scenario_4_duplicate_documents_consume_a_single_doc_id() {
    let source = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();

    write_record(
        source.path(),
        "a.json",
        "https://ex.com/a",
        "the quick brown fox jumps over the lazy dog",
    );
    write_record(
        source.path(),
        "b.json",
        "https://ex.com/b",
        "the quick brown fox jumps over the lazy dog",
    );

    let config = Config {
        source: source.path().to_path_buf(),
        data_dir: data.path().to_path_buf(),
        no_duplicate_detection: false,
        ..Config::default()
    };
    let report = build_index(&config).unwrap();
    assert_eq!(report.documents_indexed, 1);

    let mapper = PathMapper::load(&config.mappers_dir().join("paths.bin")).unwrap();
    assert_eq!(mapper.len(), 1);
    assert_eq!(
        mapper.url_of(strata::DocId(0)),
        Some("https://ex.com/a")
    );
}

#[test]
fn scenario_5_forced_multi_flush_build_matches_single_flush_build() {
    let docs: Vec<(String, String)> = (0..500)
        .map(|i| {
            (
                format!("https://ex.com/{i}"),
                format!("document number {i} about quick brown foxes and lazy dogs"),
            )
        })
        .collect();
    let doc_refs: Vec<(&str, &str)> = docs.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

    let source = tempfile::tempdir().unwrap();
    for (i, (url, content)) in doc_refs.iter().enumerate() {
        write_record(source.path(), &format!("{i}.json"), url, content);
    }

    // A tiny memory budget forces many partition-builder flushes.
    let data_many = tempfile::tempdir().unwrap();
    let config_many = Config {
        source: source.path().to_path_buf(),
        data_dir: data_many.path().to_path_buf(),
        no_duplicate_detection: true,
        memory_budget_bytes: 256,
        partition_target_bytes: 512,
        ..Config::default()
    };
    let report_many = build_index(&config_many).unwrap();

    // An effectively infinite budget flushes exactly once.
    let data_one = tempfile::tempdir().unwrap();
    let config_one = Config {
        source: source.path().to_path_buf(),
        data_dir: data_one.path().to_path_buf(),
        no_duplicate_detection: true,
        memory_budget_bytes: usize::MAX,
        partition_target_bytes: usize::MAX,
        ..Config::default()
    };
    let report_one = build_index(&config_one).unwrap();

    assert_eq!(report_many.documents_indexed, report_one.documents_indexed);
    assert_eq!(report_many.vocabulary_size, report_one.vocabulary_size);

    let searcher_many = Searcher::open(&config_many).unwrap();
    let searcher_one = Searcher::open(&config_one).unwrap();
    for query in ["quick brown", "lazy dogs", "document number 42"] {
        let hits_many = searcher_many.search(query, 20).unwrap();
        let hits_one = searcher_one.search(query, 20).unwrap();
        assert_eq!(hits_many.len(), hits_one.len());
        for (a, b) in hits_many.iter().zip(hits_one.iter()) {
            assert_eq!(a.url, b.url);
            assert!((a.score - b.score).abs() < 1e-4);
        }
    }
}

#[test]
fn scenario_6_query_pipeline_is_case_and_punctuation_insensitive() {
    let (_source, _data, config, _report) = build_corpus(&[
        ("https://ex.com/0", "quick brown fox"),
        ("https://ex.com/1", "slow red turtle"),
    ]);

    let searcher = Searcher::open(&config).unwrap();
    let noisy = searcher.search("QUICK   Brown!!", 10).unwrap();
    let clean = searcher.search("quick brown", 10).unwrap();

    assert_eq!(noisy.len(), clean.len());
    for (a, b) in noisy.iter().zip(clean.iter()) {
        assert_eq!(a.url, b.url);
        assert!((a.score - b.score).abs() < 1e-6);
    }
}

#[test]
fn repeated_queries_against_a_ready_index_are_deterministic() {
    let (_source, _data, config, _report) = build_corpus(&[
        ("https://ex.com/0", "the quick brown fox"),
        ("https://ex.com/1", "quick brown dogs"),
        ("https://ex.com/2", "lazy fox"),
    ]);

    let searcher = Searcher::open(&config).unwrap();
    let first = searcher.search("quick fox", 10).unwrap();
    for _ in 0..5 {
        let again = searcher.search("quick fox", 10).unwrap();
        assert_eq!(first.len(), again.len());
        for (a, b) in first.iter().zip(again.iter()) {
            assert_eq!(a.url, b.url);
            assert_eq!(a.score, b.score);
        }
    }
}
