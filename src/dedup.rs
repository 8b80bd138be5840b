// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Near-duplicate suppression during ingestion (spec.md §4.3). Optional,
//! controlled by `Config::no_duplicate_detection`.
//!
//! Two checks, cheapest first: an exact hash over the normalized token
//! stream rejects byte-identical content outright; a 64-bit SimHash with a
//! Hamming-distance neighborhood search catches near-duplicates that exact
//! hashing would miss. Rejected documents consume no `doc_id`.

use crate::error::DuplicateKind;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// Hamming-distance threshold for near-duplicate rejection. spec.md §9
/// notes this value is inferred, not documented in the original system;
/// kept as a named, overridable constant.
pub const SIMHASH_HAMMING_THRESHOLD: u32 = 3;

#[derive(Default)]
pub struct DuplicateDetector {
    exact_hashes: HashSet<u64>,
    simhashes: Vec<u64>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        DuplicateDetector::default()
    }

    /// Check `tokens` (the normalized token stream for a candidate
    /// document) against everything accepted so far. On acceptance, both
    /// fingerprints are recorded so later documents are checked against
    /// this one too.
    pub fn check(&mut self, tokens: &[String]) -> Result<(), DuplicateKind> {
        let exact = exact_hash(tokens);
        if self.exact_hashes.contains(&exact) {
            return Err(DuplicateKind::Exact);
        }

        let sim = simhash(tokens);
        if self
            .simhashes
            .iter()
            .any(|&seen| hamming_distance(seen, sim) <= SIMHASH_HAMMING_THRESHOLD)
        {
            return Err(DuplicateKind::Near);
        }

        self.exact_hashes.insert(exact);
        self.simhashes.push(sim);
        Ok(())
    }
}

fn exact_hash(tokens: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    tokens.hash(&mut hasher);
    hasher.finish()
}

/// 64-bit SimHash: hash each distinct token weighted by its frequency,
/// accumulate per-bit votes, then take the sign of each accumulator.
fn simhash(tokens: &[String]) -> u64 {
    let mut frequencies: HashMap<&str, u32> = HashMap::new();
    for token in tokens {
        *frequencies.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut bit_votes = [0i64; 64];
    for (token, freq) in frequencies {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let h = hasher.finish();
        for (bit, vote) in bit_votes.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *vote += freq as i64;
            } else {
                *vote -= freq as i64;
            }
        }
    }

    let mut fingerprint = 0u64;
    for (bit, vote) in bit_votes.iter().enumerate() {
        if *vote > 0 {
            fingerprint |= 1 << bit;
        }
    }
    fingerprint
}

fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}
