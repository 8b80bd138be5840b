// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! HTML parsing: pull out visible text, tagging each text node with the
//! nearest structural element of interest (spec.md §4.1: title, h1-h6, b,
//! strong).

use crate::types::Tag;
use scraper::{Html, Node};

/// One chunk of visible text plus the tag it was found under.
pub struct TaggedText {
    pub text: String,
    pub tag: Tag,
}

/// Walk the DOM depth-first, emitting a `TaggedText` per text node. The
/// nearest ancestor element among title/h1-h6/b/strong determines the tag;
/// everything else falls back to `Tag::Body`.
pub fn extract_tagged_text(html: &str) -> Vec<TaggedText> {
    let document = Html::parse_document(html);
    let mut out = Vec::new();
    walk(document.tree.root(), Tag::Body, &mut out);
    out
}

fn element_tag(name: &str) -> Option<Tag> {
    match name {
        "title" => Some(Tag::Title),
        "h1" => Some(Tag::H1),
        "h2" => Some(Tag::H2),
        "h3" => Some(Tag::H3),
        "h4" => Some(Tag::H4),
        "h5" => Some(Tag::H5),
        "h6" => Some(Tag::H6),
        "b" | "strong" => Some(Tag::Bold),
        "script" | "style" => None,
        _ => None,
    }
}

fn walk(node: ego_tree::NodeRef<Node>, current_tag: Tag, out: &mut Vec<TaggedText>) {
    match node.value() {
        Node::Text(text) => {
            let s = text.trim();
            if !s.is_empty() {
                out.push(TaggedText {
                    text: s.to_string(),
                    tag: current_tag,
                });
            }
        }
        Node::Element(el) => {
            let name = el.name();
            if name == "script" || name == "style" {
                return;
            }
            let tag = element_tag(name).unwrap_or(current_tag);
            for child in node.children() {
                walk(child, tag, out);
            }
        }
        _ => {
            for child in node.children() {
                walk(child, current_tag, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_title_and_heading() {
        let html = "<html><head><title>About</title></head><body><h1>Intro</h1><p>hello world</p></body></html>";
        let chunks = extract_tagged_text(html);
        assert!(chunks
            .iter()
            .any(|c| c.text == "About" && c.tag == Tag::Title));
        assert!(chunks.iter().any(|c| c.text == "Intro" && c.tag == Tag::H1));
        assert!(chunks
            .iter()
            .any(|c| c.text == "hello world" && c.tag == Tag::Body));
    }

    #[test]
    fn bold_and_strong_map_to_bold_tag() {
        let html = "<p>plain <b>bold</b> and <strong>strong</strong></p>";
        let chunks = extract_tagged_text(html);
        assert!(chunks
            .iter()
            .any(|c| c.text == "bold" && c.tag == Tag::Bold));
        assert!(chunks
            .iter()
            .any(|c| c.text == "strong" && c.tag == Tag::Bold));
    }

    #[test]
    fn script_and_style_content_dropped() {
        let html = "<p>visible</p><script>var x = 1;</script><style>.a{}</style>";
        let chunks = extract_tagged_text(html);
        assert!(!chunks.iter().any(|c| c.text.contains("var x")));
        assert!(!chunks.iter().any(|c| c.text.contains(".a")));
    }
}
