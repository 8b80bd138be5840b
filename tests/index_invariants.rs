//! Property tests for the on-disk index invariants in spec.md §8:
//! df equals posting-list length, final partitions are disjoint and
//! cover the vocabulary, and document vectors are L2-normalized.

mod common;

use common::build_corpus;
use proptest::prelude::*;
use strata::binary::{read_df_table, read_directory, read_vector_table};
use strata::binary::partition::read_partition_file;

fn word_bank() -> Vec<&'static str> {
    vec![
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
        "juliet", "kilo", "lima", "mike", "november", "oscar", "papa",
    ]
}

fn doc_strategy() -> impl Strategy<Value = Vec<String>> {
    let bank = word_bank();
    prop::collection::vec(0..bank.len(), 1..12)
        .prop_map(move |idxs| idxs.into_iter().map(|i| bank[i].to_string()).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// For an arbitrary corpus, every final partition's token entries have
    /// `df == posting_list.len()`, postings are strictly ascending by
    /// doc_id, partitions are pairwise token-disjoint, and every document
    /// vector is unit-length (or empty, for a zero-weight document).
    #[test]
    fn index_invariants_hold_for_arbitrary_corpora(
        docs in prop::collection::vec(doc_strategy(), 1..16)
    ) {
        let pairs: Vec<(String, String)> = docs
            .iter()
            .enumerate()
            .map(|(i, words)| (format!("https://ex.com/{i}"), words.join(" ")))
            .collect();
        let refs: Vec<(&str, &str)> = pairs.iter().map(|(u, c)| (u.as_str(), c.as_str())).collect();

        let (_source, _data, config, report) = build_corpus(&refs);

        let directory = read_directory(&config.index_dir().join("partitions.dir")).unwrap();
        let df_table: std::collections::HashMap<_, _> =
            read_df_table(&config.index_dir().join("df.bin")).unwrap().into_iter().collect();

        let mut seen_tokens = std::collections::HashSet::new();
        for entry in &directory {
            let records = read_partition_file(&config.index_dir().join(&entry.file_name)).unwrap();
            for (token, token_entry) in &records {
                // df matches posting-list length.
                prop_assert_eq!(token_entry.df as usize, token_entry.postings.len());
                prop_assert_eq!(df_table.get(token).copied(), Some(token_entry.df));

                // postings strictly ascending by doc_id, no duplicates.
                for w in token_entry.postings.windows(2) {
                    prop_assert!(w[0].doc_id.get() < w[1].doc_id.get());
                }

                // each token appears in exactly one partition.
                prop_assert!(seen_tokens.insert(token.clone()), "token {token} appeared in more than one partition");
            }
        }
        prop_assert_eq!(seen_tokens.len(), report.vocabulary_size);

        let vectors = read_vector_table(&config.index_dir().join("vectors.bin")).unwrap();
        prop_assert_eq!(vectors.len(), report.documents_indexed);
        for vector in &vectors {
            // A document whose every token has idf == 0 (appears in every
            // document) normalizes to a zero vector rather than unit
            // length; anything else must be unit-length.
            let norm = vector.norm();
            prop_assert!(norm < 1e-6 || (norm - 1.0).abs() < 1e-3);
        }
    }
}
