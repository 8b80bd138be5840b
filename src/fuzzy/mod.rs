// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distance, used by the searcher's spellcheck fallback
//! (`crate::search::spellcheck`) to find near-miss vocabulary terms for a
//! zero-hit query.

mod levenshtein;

pub use levenshtein::levenshtein_within;
