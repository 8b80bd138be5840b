// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit-distance fallback for zero-hit queries (spec.md §4.7, opt-in via
//! `Config::use_spellcheck`). Replaces any query token absent from the
//! vocabulary with the closest vocabulary term within two edits; closest
//! distance wins, ties broken by higher document frequency (so common
//! words are preferred over rare near-misses) and, if df also ties, by
//! lower token text so the result never depends on vocabulary iteration
//! order.

use crate::fuzzy::levenshtein_within;
use crate::types::Token;

const MAX_EDIT_DISTANCE: usize = 2;

/// Return a corrected token list: tokens already present in the (`known`)
/// vocabulary are left untouched, absent ones are replaced with the
/// nearest `(token, df)` vocabulary entry if one exists within
/// `MAX_EDIT_DISTANCE` edits. `vocabulary` need not be presented in any
/// particular order; the tie-break below makes the result independent of
/// it.
pub fn correct<'a>(
    tokens: &[Token],
    vocabulary: impl Iterator<Item = (&'a Token, u32)> + Clone,
) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| {
            if vocabulary.clone().any(|(v, _)| v == token) {
                return token.clone();
            }
            nearest(token, vocabulary.clone()).unwrap_or_else(|| token.clone())
        })
        .collect()
}

fn nearest<'a>(token: &str, vocabulary: impl Iterator<Item = (&'a Token, u32)>) -> Option<Token> {
    let mut best: Option<(usize, u32, &Token)> = None;
    for (candidate, df) in vocabulary {
        for distance in 1..=MAX_EDIT_DISTANCE {
            if levenshtein_within(token, candidate, distance) {
                let better = match best {
                    None => true,
                    Some((best_distance, best_df, best_candidate)) => {
                        distance < best_distance
                            || (distance == best_distance && df > best_df)
                            || (distance == best_distance
                                && df == best_df
                                && candidate.as_str() < best_candidate.as_str())
                    }
                };
                if better {
                    best = Some((distance, df, candidate));
                }
                break;
            }
        }
    }
    best.map(|(_, _, candidate)| candidate.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(pairs: &[(&str, u32)]) -> Vec<(Token, u32)> {
        pairs.iter().map(|(t, df)| (t.to_string(), *df)).collect()
    }

    #[test]
    fn corrects_a_single_typo_to_the_nearest_known_term() {
        let vocabulary = vocab(&[("fox", 3), ("hound", 1), ("quick", 2)]);
        let tokens = vec!["fxo".to_string()];
        let corrected = correct(&tokens, vocabulary.iter().map(|(t, df)| (t, *df)));
        assert_eq!(corrected, vec!["fox".to_string()]);
    }

    #[test]
    fn leaves_known_tokens_untouched() {
        let vocabulary = vocab(&[("fox", 1)]);
        let tokens = vec!["fox".to_string()];
        assert_eq!(
            correct(&tokens, vocabulary.iter().map(|(t, df)| (t, *df))),
            tokens
        );
    }

    #[test]
    fn leaves_tokens_with_no_close_match_untouched() {
        let vocabulary = vocab(&[("zebra", 1)]);
        let tokens = vec!["quantum".to_string()];
        assert_eq!(
            correct(&tokens, vocabulary.iter().map(|(t, df)| (t, *df))),
            tokens
        );
    }

    #[test]
    fn ties_at_equal_distance_prefer_higher_document_frequency() {
        // "cot", "cat", "cut" are each one edit from "cet"; "cat" has the
        // highest df, so it wins regardless of vocabulary iteration order.
        let vocabulary = vocab(&[("cot", 2), ("cat", 5), ("cut", 2)]);
        let tokens = vec!["cet".to_string()];
        let corrected = correct(&tokens, vocabulary.iter().map(|(t, df)| (t, *df)));
        assert_eq!(corrected, vec!["cat".to_string()]);
    }

    #[test]
    fn ties_at_equal_distance_and_df_prefer_lower_token_text() {
        let vocabulary = vocab(&[("cut", 2), ("cot", 2)]);
        let tokens = vec!["cet".to_string()];
        let corrected = correct(&tokens, vocabulary.iter().map(|(t, df)| (t, *df)));
        assert_eq!(corrected, vec!["cot".to_string()]);
    }
}
