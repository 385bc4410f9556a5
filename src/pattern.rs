//! Pattern normalization and matcher compilation.
//!
//! A rule keyword of regex type may arrive either as a bare pattern or in
//! delimited `/pattern/flags` form. This module parses both into a single
//! `ParsedPattern`, guarantees the Unicode-safety flag is present, and turns
//! the result into a compiled `regex::Regex` evaluator. The normalized form
//! is the single source of truth consumed by both validation and runtime
//! matching, so the two cannot diverge.

use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::errors::FilterError;

/// Size limit for a compiled matcher, in bytes.
const MATCHER_SIZE_LIMIT: usize = 10 * (1 << 20);

static DELIMITED_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/((?s).*)/([a-z]*)$").unwrap());

/// The normalized form of a regex-type keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    /// The pattern body, with surrounding delimiters stripped.
    pub pattern: String,
    /// Flag letters, de-duplicated, always containing `u`.
    pub flags: String,
    /// The raw input as received.
    pub original: String,
    /// Whether the input was in `/pattern/flags` form. Recorded because it
    /// changes how the value is re-serialized for copy/edit actions.
    pub was_delimited: bool,
}

/// Parses a raw keyword that is either delimited (`/pattern/flags`) or a
/// bare pattern. The Unicode-safety flag is added if absent and duplicate
/// flag letters are dropped, keeping first occurrence.
pub fn parse_pattern_input(input: &str) -> ParsedPattern {
    let trimmed = input.trim();
    if let Some(caps) = DELIMITED_FORM.captures(trimmed) {
        let pattern = caps.get(1).map_or("", |m| m.as_str()).to_string();
        let raw_flags = caps.get(2).map_or("", |m| m.as_str());
        let flags = dedupe_flags(&with_unicode_flag(raw_flags));
        return ParsedPattern {
            pattern,
            flags,
            original: input.to_string(),
            was_delimited: true,
        };
    }
    ParsedPattern {
        pattern: input.to_string(),
        flags: "u".to_string(),
        original: input.to_string(),
        was_delimited: false,
    }
}

/// Appends the Unicode-safety flag if it is not already present.
pub fn with_unicode_flag(flags: &str) -> String {
    if flags.contains('u') {
        flags.to_string()
    } else {
        format!("{flags}u")
    }
}

/// Drops duplicate flag letters, keeping the first occurrence of each.
pub fn dedupe_flags(flags: &str) -> String {
    let mut seen = String::with_capacity(flags.len());
    for ch in flags.chars() {
        if !seen.contains(ch) {
            seen.push(ch);
        }
    }
    seen
}

/// Builds a matching evaluator from a normalized pattern.
///
/// Flag letters map onto the builder: `i` case-insensitive, `m` multi-line,
/// `s` dot-matches-newline, `x` ignore-whitespace, `u` Unicode. The `g` flag
/// has no compile-time meaning here; find-all iteration is inherent in how
/// the evaluator is driven.
pub fn compile_matcher(parsed: &ParsedPattern) -> Result<Regex, FilterError> {
    debug!(
        "Compiling matcher from pattern ({} bytes, flags '{}')",
        parsed.pattern.len(),
        parsed.flags
    );
    RegexBuilder::new(&parsed.pattern)
        .unicode(parsed.flags.contains('u'))
        .case_insensitive(parsed.flags.contains('i'))
        .multi_line(parsed.flags.contains('m'))
        .dot_matches_new_line(parsed.flags.contains('s'))
        .ignore_whitespace(parsed.flags.contains('x'))
        .size_limit(MATCHER_SIZE_LIMIT)
        .build()
        .map_err(FilterError::InvalidPattern)
}
