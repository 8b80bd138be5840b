// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The Index Splitter (spec.md §4.6): consumes the merged token stream and
//! writes it out as final, size-bounded partition files plus a partition
//! directory, then runs a second pass over those same partitions to build
//! the df table and the per-document TF-IDF vector table.
//!
//! A partition never splits mid-token: the target size is checked only
//! after a complete `(token, TokenEntry)` record has been appended, so the
//! boundary always falls between two distinct tokens.

use crate::binary::partition::{encode_record, read_partition_file, write_partition_file};
use crate::binary::{write_df_table, write_vector_table, PartitionDirectoryEntry};
use crate::build::merge::KWayMerger;
use crate::scoring;
use crate::types::{DocVector, Token, TokenEntry};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

pub struct SplitReport {
    pub partition_files: usize,
    pub vocabulary_size: usize,
}

/// Drain `merger` into final partitions under `index_dir`, then build the
/// df table and document-vector table. `total_docs` is the corpus size
/// (the df/idf denominator and the length of the vector table).
pub fn split_and_finalize(
    mut merger: KWayMerger,
    index_dir: &Path,
    partition_target_bytes: usize,
    total_docs: u32,
) -> io::Result<SplitReport> {
    fs::create_dir_all(index_dir)?;

    let mut df_table: BTreeMap<Token, u32> = BTreeMap::new();
    let mut directory: Vec<PartitionDirectoryEntry> = Vec::new();
    let mut current_records: Vec<(Token, TokenEntry)> = Vec::new();
    let mut current_bytes = 0usize;
    let mut partition_index = 0usize;

    while let Some((token, entry)) = merger.next_entry()? {
        df_table.insert(token.clone(), entry.df);

        let mut scratch = Vec::new();
        current_bytes += encode_record(&token, &entry, &mut scratch);
        current_records.push((token, entry));

        if current_bytes >= partition_target_bytes {
            flush_partition(
                index_dir,
                &mut directory,
                &mut current_records,
                &mut partition_index,
            )?;
            current_bytes = 0;
        }
    }
    flush_partition(
        index_dir,
        &mut directory,
        &mut current_records,
        &mut partition_index,
    )?;

    crate::binary::write_directory(&index_dir.join("partitions.dir"), &directory)?;
    write_df_table(&index_dir.join("df.bin"), &df_table)?;

    let vectors = build_document_vectors(index_dir, &directory, &df_table, total_docs)?;
    write_vector_table(&index_dir.join("vectors.bin"), &vectors)?;

    Ok(SplitReport {
        partition_files: directory.len(),
        vocabulary_size: df_table.len(),
    })
}

fn flush_partition(
    index_dir: &Path,
    directory: &mut Vec<PartitionDirectoryEntry>,
    current_records: &mut Vec<(Token, TokenEntry)>,
    partition_index: &mut usize,
) -> io::Result<()> {
    if current_records.is_empty() {
        return Ok(());
    }
    let smallest_token = current_records[0].0.clone();
    let file_name = format!(
        "partition_{:05}_{}.bin",
        *partition_index,
        sanitize_for_filename(&smallest_token)
    );
    *partition_index += 1;

    let path = index_dir.join(&file_name);
    let refs: Vec<(&str, &TokenEntry)> = current_records
        .iter()
        .map(|(t, e)| (t.as_str(), e))
        .collect();
    write_partition_file(&path, refs)?;

    directory.push(PartitionDirectoryEntry {
        smallest_token,
        file_name,
    });
    current_records.clear();
    Ok(())
}

/// Second pass: reread the final partitions (df is already known from pass
/// one) and accumulate each document's sparse TF-IDF weight vector, then
/// L2-normalize (spec.md §4.6; zero-length documents are left with an
/// empty, un-normalized weight map rather than dividing by zero).
fn build_document_vectors(
    index_dir: &Path,
    directory: &[PartitionDirectoryEntry],
    df_table: &BTreeMap<Token, u32>,
    total_docs: u32,
) -> io::Result<Vec<DocVector>> {
    let mut weights: Vec<BTreeMap<Token, f32>> = vec![BTreeMap::new(); total_docs as usize];
    let mut lengths: Vec<u32> = vec![0; total_docs as usize];

    for entry in directory {
        let records = read_partition_file(&index_dir.join(&entry.file_name))?;
        for (token, token_entry) in records {
            let df = *df_table.get(&token).unwrap_or(&token_entry.df);
            let idf = scoring::idf(total_docs, df);
            for posting in &token_entry.postings {
                let idx = posting.doc_id.as_usize();
                let tf = scoring::tf_weight(posting.frequency)
                    * scoring::tag_boost(&posting.tag_frequencies);
                weights[idx].insert(token.clone(), tf * idf);
                lengths[idx] += posting.frequency;
            }
        }
    }

    let vectors = weights
        .into_iter()
        .zip(lengths)
        .map(|(mut w, length)| {
            let norm = w.values().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in w.values_mut() {
                    *v /= norm;
                }
            }
            DocVector { length, weights: w }
        })
        .collect();
    Ok(vectors)
}

fn sanitize_for_filename(token: &str) -> String {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(24)
        .collect();
    if cleaned.is_empty() {
        "tok".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::partition::write_partition_file as write_spill;
    use crate::binary::read_vector_table;
    use crate::types::{DocId, Posting, Tag, TagFrequencies};
    use tempfile::tempdir;

    fn posting(doc_id: u32, frequency: u32, tag: Tag) -> Posting {
        let mut tags = TagFrequencies::new();
        tags.insert(tag, frequency);
        Posting {
            doc_id: DocId(doc_id),
            frequency,
            tag_frequencies: tags,
        }
    }

    #[test]
    fn splits_into_partitions_and_builds_normalized_vectors() {
        let spill_dir = tempdir().unwrap();
        let index_dir = tempdir().unwrap();

        let merged = [
            (
                "fox".to_string(),
                TokenEntry {
                    df: 2,
                    postings: vec![posting(0, 3, Tag::Title), posting(1, 1, Tag::Body)],
                },
            ),
            (
                "hound".to_string(),
                TokenEntry {
                    df: 1,
                    postings: vec![posting(1, 2, Tag::Body)],
                },
            ),
        ];
        let spill_path = spill_dir.path().join("spill_000000_fox.bin");
        let refs: Vec<_> = merged.iter().map(|(t, e)| (t.as_str(), e)).collect();
        write_spill(&spill_path, refs).unwrap();

        let merger = KWayMerger::open(&[spill_path]).unwrap();
        // total_docs = 3 (not 2) so "fox" (df=2) still has nonzero idf; a
        // term in every document would legitimately normalize to a
        // zero-weight vector entry, which the assertions below don't expect.
        let report = split_and_finalize(merger, index_dir.path(), 1024 * 1024, 3).unwrap();

        assert_eq!(report.vocabulary_size, 2);
        assert!(index_dir.path().join("partitions.dir").is_file());
        assert!(index_dir.path().join("df.bin").is_file());

        let vectors = read_vector_table(&index_dir.path().join("vectors.bin")).unwrap();
        assert_eq!(vectors.len(), 3);
        for vector in &vectors {
            if !vector.weights.is_empty() {
                assert!((vector.norm() - 1.0).abs() < 1e-4);
            }
        }
        assert!(vectors[0].weights.contains_key("fox"));
        assert!(vectors[1].weights.contains_key("hound"));
    }

    #[test]
    fn never_splits_mid_token_even_with_tiny_target() {
        let spill_dir = tempdir().unwrap();
        let index_dir = tempdir().unwrap();

        let merged = [
            (
                "apple".to_string(),
                TokenEntry {
                    df: 1,
                    postings: vec![posting(0, 1, Tag::Body)],
                },
            ),
            (
                "banana".to_string(),
                TokenEntry {
                    df: 1,
                    postings: vec![posting(0, 1, Tag::Body)],
                },
            ),
        ];
        let spill_path = spill_dir.path().join("spill_000000_apple.bin");
        let refs: Vec<_> = merged.iter().map(|(t, e)| (t.as_str(), e)).collect();
        write_spill(&spill_path, refs).unwrap();

        let merger = KWayMerger::open(&[spill_path]).unwrap();
        let report = split_and_finalize(merger, index_dir.path(), 1, 1).unwrap();
        assert_eq!(report.partition_files, 2);

        let directory =
            crate::binary::read_directory(&index_dir.path().join("partitions.dir")).unwrap();
        for entry in &directory {
            let records = read_partition_file(&index_dir.path().join(&entry.file_name)).unwrap();
            assert_eq!(records.len(), 1);
        }
    }
}
