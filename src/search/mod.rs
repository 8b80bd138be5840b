// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query engine (spec.md §4.7): tokenize the query, resolve each term
//! to its partition via the directory, accumulate a TF-IDF-weighted
//! candidate set, prune to a bounded working set, and rank by cosine
//! similarity against precomputed document vectors.

pub mod spellcheck;

use crate::binary::partition::read_partition_file;
use crate::binary::{read_df_table, read_directory, read_vector_table, PartitionDirectoryEntry};
use crate::config::Config;
use crate::error::{Result, StrataError};
use crate::path_mapper::PathMapper;
use crate::scoring;
use crate::text;
use crate::types::{DocId, DocVector, SearchHit, Token, TokenEntry};
use std::collections::{BTreeMap, HashMap};
use std::io;

pub struct Searcher {
    config: Config,
    directory: Vec<PartitionDirectoryEntry>,
    df_table: HashMap<Token, u32>,
    vectors: Vec<DocVector>,
    path_mapper: PathMapper,
}

impl Searcher {
    /// Load every artifact a `Ready` index needs. Callers should check
    /// `crate::state::detect` first; this does not itself validate
    /// readiness beyond the files loading successfully.
    pub fn open(config: &Config) -> Result<Self> {
        let index_dir = config.index_dir();
        let directory = read_directory(&index_dir.join("partitions.dir"))
            .map_err(|source| to_corrupt(&index_dir, source))?;
        let df_table = read_df_table(&index_dir.join("df.bin"))
            .map_err(|source| to_corrupt(&index_dir, source))?
            .into_iter()
            .collect();
        let vectors = read_vector_table(&index_dir.join("vectors.bin"))
            .map_err(|source| to_corrupt(&index_dir, source))?;
        let mappers_dir = config.mappers_dir();
        let path_mapper = PathMapper::load(&mappers_dir.join("paths.bin"))
            .map_err(|source| to_corrupt(&mappers_dir, source))?;

        Ok(Searcher {
            config: config.clone(),
            directory,
            df_table,
            vectors,
            path_mapper,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.df_table.len()
    }

    pub fn document_count(&self) -> usize {
        self.vectors.len()
    }

    /// Run a query, returning up to `k` hits ranked by cosine similarity,
    /// highest first, ties broken by lower `doc_id`. Falls back to
    /// spellcheck-corrected terms on a zero-hit query when
    /// `Config::use_spellcheck` is set.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let tokens = text::tokenize_query(query);
        if tokens.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let hits = self.search_tokens(&tokens, k)?;
        if !hits.is_empty() || !self.config.use_spellcheck {
            return Ok(hits);
        }

        let corrected = spellcheck::correct(&tokens, self.df_table.iter().map(|(t, &df)| (t, df)));
        if corrected == tokens {
            return Ok(hits);
        }
        self.search_tokens(&corrected, k)
    }

    fn search_tokens(&self, tokens: &[Token], k: usize) -> Result<Vec<SearchHit>> {
        let mut query_tf: HashMap<&Token, u32> = HashMap::new();
        for token in tokens {
            *query_tf.entry(token).or_insert(0) += 1;
        }

        let total_docs = self.vectors.len() as u32;
        let mut query_weights: HashMap<&Token, f32> = HashMap::new();
        let mut partition_cache: HashMap<String, Vec<(Token, TokenEntry)>> = HashMap::new();
        // BTreeMap, not HashMap: iteration order feeds the select_nth_unstable_by
        // prune below, and that order must be deterministic (by doc_id) for
        // ties at the cutoff to resolve the same way on every run.
        let mut dot: BTreeMap<DocId, f32> = BTreeMap::new();

        for (&token, &count) in &query_tf {
            let df = match self.df_table.get(token) {
                Some(&df) => df,
                None => continue,
            };
            let idf = scoring::idf(total_docs, df);
            let qw = scoring::tf_weight(count) * idf;
            query_weights.insert(token, qw);

            let entry = self
                .lookup_token(token, &mut partition_cache)
                .map_err(|source| StrataError::IoFatal {
                    stage: "reading partition during search",
                    source,
                })?;
            let Some(entry) = entry else { continue };

            for posting in &entry.postings {
                let doc_weight = self
                    .vectors
                    .get(posting.doc_id.as_usize())
                    .and_then(|v| v.weights.get(token))
                    .copied()
                    .unwrap_or(0.0);
                *dot.entry(posting.doc_id).or_insert(0.0) += qw * doc_weight;
            }
        }

        if dot.is_empty() {
            return Ok(Vec::new());
        }

        let query_norm = query_weights.values().map(|w| w * w).sum::<f32>().sqrt();

        // Bound the candidate set before the final sort (spec.md §4.7 step
        // 4): keep only the top `prune_cap` candidates by raw dot product.
        let prune_cap = (scoring::DEFAULT_PRUNE_MULTIPLIER * k).max(k);
        let mut scored: Vec<(DocId, f32)> = dot.into_iter().collect();
        if scored.len() > prune_cap {
            scored.select_nth_unstable_by(prune_cap - 1, |a, b| b.1.partial_cmp(&a.1).unwrap());
            scored.truncate(prune_cap);
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let hits = scored
            .into_iter()
            .filter_map(|(doc_id, raw_score)| {
                let url = self.path_mapper.url_of(doc_id)?.to_string();
                let score = if query_norm > 0.0 {
                    raw_score / query_norm
                } else {
                    0.0
                };
                Some(SearchHit { url, doc_id, score })
            })
            .collect();
        Ok(hits)
    }

    fn lookup_token(
        &self,
        token: &str,
        cache: &mut HashMap<String, Vec<(Token, TokenEntry)>>,
    ) -> io::Result<Option<TokenEntry>> {
        let Some(entry) = locate_partition(&self.directory, token) else {
            return Ok(None);
        };
        if !cache.contains_key(&entry.file_name) {
            let records = read_partition_file(&self.config.index_dir().join(&entry.file_name))?;
            cache.insert(entry.file_name.clone(), records);
        }
        let records = &cache[&entry.file_name];
        Ok(records
            .binary_search_by(|(t, _)| t.as_str().cmp(token))
            .ok()
            .map(|idx| records[idx].1.clone()))
    }
}

fn to_corrupt(path: &std::path::Path, source: io::Error) -> StrataError {
    StrataError::CorruptIndex {
        path: path.to_path_buf(),
        reason: source.to_string(),
    }
}

/// Binary-search the partition directory for the partition whose range
/// could contain `token` (spec.md §4.7 step 2): the last entry whose
/// `smallest_token` is `<= token`.
fn locate_partition<'a>(
    directory: &'a [PartitionDirectoryEntry],
    token: &str,
) -> Option<&'a PartitionDirectoryEntry> {
    let idx = directory.partition_point(|e| e.smallest_token.as_str() <= token);
    if idx == 0 {
        return None;
    }
    Some(&directory[idx - 1])
}
