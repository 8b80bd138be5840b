// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The text pipeline: the one place tokenization happens, shared by
//! indexing and querying. Any divergence between the two call sites breaks
//! recall (spec.md §4.1), so both `tokenize_document` and `tokenize_query`
//! funnel through `normalize_and_split`.

mod html;
mod stemmer;
mod stopwords;

pub use html::{extract_tagged_text, TaggedText};
pub use stemmer::lemmatize;
pub use stopwords::is_stop_word;

use crate::types::{Tag, Token};
use unicode_normalization::UnicodeNormalization;

/// Defensive cap on token length (spec.md §9: pathological long tokens).
pub const MAX_TOKEN_LEN: usize = 64;

/// One token occurrence in a document, with the tag it came from.
pub struct DocumentToken {
    pub token: Token,
    pub tag: Tag,
}

/// Unicode-normalize, lowercase, and split `text` on non-alphanumeric
/// boundaries, dropping stop words and anything that vanishes to nothing
/// (or is longer than `MAX_TOKEN_LEN`) after folding.
fn normalize_and_split(text: &str) -> Vec<String> {
    let folded: String = text.nfkd().collect::<String>().to_lowercase();
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter(|w| w.chars().count() <= MAX_TOKEN_LEN)
        .filter(|w| !is_stop_word(w))
        .map(|w| w.to_string())
        .collect()
}

/// Run the full indexing-side pipeline: HTML parse -> tag -> normalize ->
/// filter -> lemmatize, preserving structural-tag annotations per token.
pub fn tokenize_document(html: &str) -> Vec<DocumentToken> {
    let mut tokens = Vec::new();
    for chunk in extract_tagged_text(html) {
        for word in normalize_and_split(&chunk.text) {
            tokens.push(DocumentToken {
                token: lemmatize(&word),
                tag: chunk.tag,
            });
        }
    }
    tokens
}

/// Run the query-side pipeline: same normalize/filter/lemmatize steps,
/// no HTML parsing and no tag tracking (a query is plain text).
pub fn tokenize_query(query: &str) -> Vec<Token> {
    normalize_and_split(query)
        .into_iter()
        .map(|w| lemmatize(&w))
        .collect()
}
