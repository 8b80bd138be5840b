// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index: documents, tokens, postings.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting list**: strictly ascending by `doc_id`, no duplicates.
//! - **TokenEntry**: `df == postings.len()`.
//! - **Partition**: tokens strictly ascending within a file; the final set of
//!   partitions covers the vocabulary disjointly.
//! - **DocId**: dense on `[0, N)` once a build completes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type-safe document identifier.
///
/// Keeps a character offset or a frequency from ever being passed where a
/// document id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    #[inline]
    pub fn new(id: u32, num_docs: usize) -> Option<Self> {
        if (id as usize) < num_docs {
            Some(DocId(id))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

/// A lemmatized, case-folded token. Distinct from `String` only by naming
/// convention, but keeps `token` vs. `url` confusion out of signatures.
pub type Token = String;

/// Structural tag a token occurred under. Ordered roughly by scoring weight
/// (see `crate::search::scoring`), title highest, body lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Title,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Bold,
    Body,
}

impl Tag {
    pub const ALL: [Tag; 9] = [
        Tag::Title,
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::Bold,
        Tag::Body,
    ];

    /// Short on-disk code, used as the map key in serialized tag frequencies.
    pub fn code(self) -> u8 {
        match self {
            Tag::Title => 0,
            Tag::H1 => 1,
            Tag::H2 => 2,
            Tag::H3 => 3,
            Tag::H4 => 4,
            Tag::H5 => 5,
            Tag::H6 => 6,
            Tag::Bold => 7,
            Tag::Body => 8,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Tag::Title,
            1 => Tag::H1,
            2 => Tag::H2,
            3 => Tag::H3,
            4 => Tag::H4,
            5 => Tag::H5,
            6 => Tag::H6,
            7 => Tag::Bold,
            8 => Tag::Body,
            _ => return None,
        })
    }
}

/// Per-tag occurrence counts for a single `(token, doc_id)` posting.
pub type TagFrequencies = BTreeMap<Tag, u32>;

/// A single token occurring in a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub frequency: u32,
    pub tag_frequencies: TagFrequencies,
}

/// `df` plus the posting list for one token. `df` is redundant with
/// `postings.len()` but kept explicit since it is what gets persisted and
/// checked (spec invariant: `df == postings.len()`).
#[derive(Debug, Clone)]
pub struct TokenEntry {
    pub df: u32,
    pub postings: Vec<Posting>,
}

impl TokenEntry {
    pub fn new() -> Self {
        TokenEntry {
            df: 0,
            postings: Vec::new(),
        }
    }

    /// Merge another entry's postings in, keeping ascending doc_id order.
    /// Callers guarantee doc_id sets are disjoint (each intermediate
    /// partition file sees any doc_id at most once per token).
    pub fn merge(&mut self, other: TokenEntry) {
        self.postings.extend(other.postings);
        self.postings.sort_by_key(|p| p.doc_id);
        self.df = self.postings.len() as u32;
    }

    pub fn is_sorted_and_deduped(&self) -> bool {
        self.postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id)
    }
}

impl Default for TokenEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// A document's length (in tokens) and precomputed TF-IDF vector, kept
/// around for cosine scoring at query time.
#[derive(Debug, Clone)]
pub struct DocVector {
    pub length: u32,
    /// Sparse, L2-normalized: token -> weight.
    pub weights: BTreeMap<Token, f32>,
}

impl DocVector {
    pub fn norm(&self) -> f32 {
        self.weights.values().map(|w| w * w).sum::<f32>().sqrt()
    }
}

/// A raw input record: `{ "url": ..., "content": ... }` plus any ignored
/// keys. Mirrors spec.md §6's input corpus contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputRecord {
    pub url: String,
    pub content: String,
}

/// A `(query, k)` search result: the document's URL and a cosine score in
/// `[0, 1]`, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub url: String,
    pub doc_id: DocId,
    pub score: f32,
}
