// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term-weighting formulas shared by the index splitter (building document
//! vectors) and the searcher (building the query vector and the TF-IDF
//! upper bound). Sharing the formula between the pruning upper bound and
//! the cosine step is what keeps pruning admissible in practice for
//! typical queries (spec.md §4.7 rationale).
//!
//! spec.md §9 leaves the pruning cutoff and per-tag multipliers
//! undocumented; the values below are this implementation's choice,
//! exposed as named constants so they can be tuned without touching the
//! scoring logic itself.

use crate::types::{Tag, TagFrequencies};

/// Per-tag weight multiplier. Title/h1 dominate; body is the baseline.
pub fn tag_weight(tag: Tag) -> f32 {
    match tag {
        Tag::Title => 8.0,
        Tag::H1 => 5.0,
        Tag::H2 => 3.0,
        Tag::H3 => 2.0,
        Tag::H4 => 1.5,
        Tag::H5 => 1.25,
        Tag::H6 => 1.1,
        Tag::Bold => 1.2,
        Tag::Body => 1.0,
    }
}

/// Sum of per-tag multipliers over the tags a posting actually occurred
/// under (spec.md §4.7 step 3: "sum over tags present of a per-tag
/// multiplier").
pub fn tag_boost(tag_frequencies: &TagFrequencies) -> f32 {
    if tag_frequencies.is_empty() {
        return tag_weight(Tag::Body);
    }
    tag_frequencies.keys().map(|&tag| tag_weight(tag)).sum()
}

/// `1 + log(freq)`, the standard sublinear TF dampening.
pub fn tf_weight(frequency: u32) -> f32 {
    1.0 + (frequency as f32).ln()
}

/// `idf(t) = log(N / df(t))`. Callers guarantee `df >= 1` (a token only
/// exists in the vocabulary if at least one document contains it) and
/// `N >= df` (df can't exceed the corpus size).
pub fn idf(total_docs: u32, df: u32) -> f32 {
    (total_docs as f32 / df.max(1) as f32).ln()
}

/// Default candidate cap for TF-IDF pruning: a small multiple of `k`
/// (spec.md §4.7 step 4).
pub const DEFAULT_PRUNE_MULTIPLIER: usize = 10;
