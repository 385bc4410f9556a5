//! Match highlighting for moderation review.
//!
//! Applies a (possibly delimited) pattern against a candidate text and
//! returns the text decomposed into alternating plain and matched segments
//! plus a match count, so the presentation layer can show why a rule fired.
//! This path never fails: a pattern that does not compile degrades to the
//! whole text as a single unmatched segment with a zero count.

use log::debug;

use crate::pattern::{compile_matcher, dedupe_flags, parse_pattern_input, with_unicode_flag};

/// One span of the highlighted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSegment {
    pub text: String,
    pub matched: bool,
}

/// The segmented text plus the number of non-empty matches found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOutcome {
    pub segments: Vec<HighlightSegment>,
    pub count: usize,
}

impl HighlightOutcome {
    fn unmatched(text: &str) -> Self {
        let segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![HighlightSegment {
                text: text.to_string(),
                matched: false,
            }]
        };
        Self { segments, count: 0 }
    }
}

/// Advances a byte offset to the next character boundary in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Highlights every match of `pattern_input` within `text`.
///
/// The pattern goes through the normalizer with a forced find-all flag.
/// Zero-length matches are skipped by advancing one character and are not
/// counted, so patterns that match the empty string cannot loop forever.
pub fn highlight_matches(text: &str, pattern_input: &str) -> HighlightOutcome {
    if pattern_input.is_empty() {
        return HighlightOutcome::unmatched(text);
    }
    let mut parsed = parse_pattern_input(pattern_input);
    parsed.flags = dedupe_flags(&with_unicode_flag(&format!("{}g", parsed.flags)));

    let matcher = match compile_matcher(&parsed) {
        Ok(re) => re,
        Err(e) => {
            debug!("Highlight pattern failed to compile, degrading: {e}");
            return HighlightOutcome::unmatched(text);
        }
    };

    let mut segments: Vec<HighlightSegment> = Vec::new();
    let mut last_end = 0usize;
    let mut pos = 0usize;
    let mut count = 0usize;

    while pos <= text.len() {
        let Some(m) = matcher.find_at(text, pos) else {
            break;
        };
        if m.start() == m.end() {
            // Zero-length match safeguard: advance by one character and do
            // not count or highlight it.
            pos = next_char_boundary(text, m.start());
            continue;
        }
        if m.start() > last_end {
            segments.push(HighlightSegment {
                text: text[last_end..m.start()].to_string(),
                matched: false,
            });
        }
        segments.push(HighlightSegment {
            text: m.as_str().to_string(),
            matched: true,
        });
        last_end = m.end();
        pos = m.end();
        count += 1;
    }

    if last_end < text.len() {
        segments.push(HighlightSegment {
            text: text[last_end..].to_string(),
            matched: false,
        });
    }
    HighlightOutcome { segments, count }
}
