// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The Partition Builder: an in-memory `token -> doc_id -> (frequency,
//! tag_frequencies)` accumulator that spills a sorted intermediate
//! partition file once its estimated memory footprint crosses
//! `Config::memory_budget_bytes` (spec.md §4.4). Bounding peak memory this
//! way, rather than by document count, is what lets the builder run over a
//! corpus much larger than RAM.

use crate::binary::partition::write_partition_file;
use crate::text::DocumentToken;
use crate::types::{DocId, TagFrequencies, Token, TokenEntry};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Rough per-posting overhead (doc_id + frequency + a couple of tag
/// entries) used to estimate accumulator size without walking every
/// `TagFrequencies` map on each check.
const BYTES_PER_POSTING_ESTIMATE: usize = 48;

pub struct PartitionBuilder {
    spill_dir: PathBuf,
    memory_budget_bytes: usize,
    accumulator: BTreeMap<Token, BTreeMap<DocId, (u32, TagFrequencies)>>,
    postings_held: usize,
    flush_count: usize,
}

impl PartitionBuilder {
    pub fn new(spill_dir: PathBuf, memory_budget_bytes: usize) -> Self {
        PartitionBuilder {
            spill_dir,
            memory_budget_bytes,
            accumulator: BTreeMap::new(),
            postings_held: 0,
            flush_count: 0,
        }
    }

    fn estimated_bytes(&self) -> usize {
        self.postings_held * BYTES_PER_POSTING_ESTIMATE
    }

    /// Fold one document's tokens into the accumulator. Returns the path of
    /// an intermediate partition file if adding this document crossed the
    /// memory budget and triggered a flush.
    pub fn add_document(
        &mut self,
        doc_id: DocId,
        tokens: &[DocumentToken],
    ) -> io::Result<Option<PathBuf>> {
        for tok in tokens {
            let per_doc = self.accumulator.entry(tok.token.clone()).or_default();
            match per_doc.get_mut(&doc_id) {
                Some((frequency, tag_frequencies)) => {
                    *frequency += 1;
                    *tag_frequencies.entry(tok.tag).or_insert(0) += 1;
                }
                None => {
                    let mut tag_frequencies = TagFrequencies::new();
                    tag_frequencies.insert(tok.tag, 1);
                    per_doc.insert(doc_id, (1, tag_frequencies));
                    self.postings_held += 1;
                }
            }
        }

        if self.estimated_bytes() >= self.memory_budget_bytes {
            return self.flush();
        }
        Ok(None)
    }

    /// Write out everything currently accumulated as one sorted
    /// intermediate partition file, then clear the accumulator. Returns
    /// `None` if there was nothing to flush.
    pub fn flush(&mut self) -> io::Result<Option<PathBuf>> {
        if self.accumulator.is_empty() {
            return Ok(None);
        }

        let records: Vec<(Token, TokenEntry)> = std::mem::take(&mut self.accumulator)
            .into_iter()
            .map(|(token, per_doc)| {
                let mut postings: Vec<_> = per_doc
                    .into_iter()
                    .map(
                        |(doc_id, (frequency, tag_frequencies))| crate::types::Posting {
                            doc_id,
                            frequency,
                            tag_frequencies,
                        },
                    )
                    .collect();
                postings.sort_by_key(|p| p.doc_id);
                let entry = TokenEntry {
                    df: postings.len() as u32,
                    postings,
                };
                (token, entry)
            })
            .collect();
        self.postings_held = 0;

        let smallest_token = sanitize_for_filename(&records[0].0);
        let path = self.spill_dir.join(format!(
            "spill_{:06}_{}.bin",
            self.flush_count, smallest_token
        ));
        self.flush_count += 1;

        let refs: Vec<(&str, &TokenEntry)> = records.iter().map(|(t, e)| (t.as_str(), e)).collect();
        write_partition_file(&path, refs)?;
        Ok(Some(path))
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
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
    use crate::binary::partition::read_partition_file;
    use crate::types::Tag;
    use tempfile::tempdir;

    fn doc_tokens(words: &[&str]) -> Vec<DocumentToken> {
        words
            .iter()
            .map(|w| DocumentToken {
                token: w.to_string(),
                tag: Tag::Body,
            })
            .collect()
    }

    #[test]
    fn flushes_when_budget_crossed() {
        let dir = tempdir().unwrap();
        let mut builder =
            PartitionBuilder::new(dir.path().to_path_buf(), BYTES_PER_POSTING_ESTIMATE * 2);

        assert!(builder
            .add_document(DocId(0), &doc_tokens(&["fox"]))
            .unwrap()
            .is_none());
        let flushed = builder
            .add_document(DocId(1), &doc_tokens(&["fox", "hound"]))
            .unwrap();
        assert!(flushed.is_some());

        let records = read_partition_file(&flushed.unwrap()).unwrap();
        let fox = records.iter().find(|(t, _)| t == "fox").unwrap();
        assert_eq!(fox.1.df, 2);
    }

    #[test]
    fn finish_flush_emits_remaining_accumulator() {
        let dir = tempdir().unwrap();
        let mut builder = PartitionBuilder::new(dir.path().to_path_buf(), usize::MAX);
        builder
            .add_document(DocId(0), &doc_tokens(&["quick", "fox"]))
            .unwrap();
        let path = builder.flush().unwrap().unwrap();
        let records = read_partition_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "fox");
        assert_eq!(records[1].0, "quick");
    }

    #[test]
    fn empty_accumulator_flush_is_noop() {
        let dir = tempdir().unwrap();
        let mut builder = PartitionBuilder::new(dir.path().to_path_buf(), usize::MAX);
        assert!(builder.flush().unwrap().is_none());
    }
}
