// src/application/highlight.rs
//
// Search-term highlighting for result titles.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    pub text: String,
    pub matched: bool,
}

impl HighlightSegment {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_string(),
            matched,
        }
    }
}

/// Split `text` into runs that do and do not match `term`.
///
/// Matching is case-insensitive and treats `term` literally. A blank term
/// yields the whole text as one unmatched segment.
pub fn highlight(text: &str, term: &str) -> Vec<HighlightSegment> {
    let term = term.trim();
    if term.is_empty() {
        return vec![HighlightSegment::new(text, false)];
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            log::warn!("Could not build highlight pattern for {:?}: {}", term, e);
            return vec![HighlightSegment::new(text, false)];
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            segments.push(HighlightSegment::new(&text[last..found.start()], false));
        }
        segments.push(HighlightSegment::new(found.as_str(), true));
        last = found.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(HighlightSegment::new(&text[last..], false));
    }
    segments
}
