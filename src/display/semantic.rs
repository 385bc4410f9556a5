//! Semantic lexeme extraction for compact rule display.
//!
//! Renders a regex-type keyword as a short sequence of Hebrew lexeme chips,
//! suppressing the technical syntax (anchors, lookarounds, quantifiers,
//! escapes) a moderator does not need to see. Intentionally lossy: the
//! output is for reading, not for matching, and extraction fails rather
//! than guessing when a pattern carries no Hebrew content — callers then
//! fall back to showing the raw pattern.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tokenizer::read_balanced;

/// Text direction a chip should be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipDir {
    Rtl,
    Ltr,
}

/// One meaningful lexeme extracted from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticChip {
    pub content: String,
    pub dir: ChipDir,
    /// Optional presentation color hint; the extractor leaves it unset.
    pub color: Option<String>,
}

impl SemanticChip {
    fn rtl(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            dir: ChipDir::Rtl,
            color: None,
        }
    }
}

/// Result of an extraction attempt. `ok` is true only if at least one chip
/// carries Hebrew content; on failure the chip set is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticResult {
    pub ok: bool,
    pub chips: Vec<SemanticChip>,
}

/// Separator used inside character-class chips; the full-width glyph
/// renders cleanly between right-to-left letters.
const CLASS_SEPARATOR: char = '／';

/// Hebrew definite-article prefix, special-cased at the pattern start.
const DEFINITE_ARTICLE: char = 'ה';

static LEADING_TECHNICAL: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\(\?[:!=<][^)]*\)").unwrap(),
        Regex::new(r"^\\[bB]").unwrap(),
    ]
});

static TRAILING_TECHNICAL: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\(\?[:!=<][^)]*\)$").unwrap(),
        Regex::new(r"\\[bB]$").unwrap(),
    ]
});

static GROUP_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\?[:!=<]").unwrap());

fn is_hebrew(ch: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&ch)
}

fn hebrew_letters(s: &str) -> String {
    s.chars().filter(|c| is_hebrew(*c)).collect()
}

/// Strips anchors, lookarounds and word boundaries from both edges of the
/// pattern. A single leading `^` and trailing `$` go first, then leading
/// and trailing technical constructs are peeled repeatedly until none
/// remain.
fn strip_outer_technical(input: &str) -> String {
    let mut s = input.trim().to_string();
    if let Some(rest) = s.strip_prefix('^') {
        s = rest.to_string();
    }
    if let Some(rest) = s.strip_suffix('$') {
        s = rest.to_string();
    }
    let mut changed = true;
    while changed {
        changed = false;
        for re in LEADING_TECHNICAL.iter() {
            if let Some(m) = re.find(&s) {
                s = s[m.end()..].to_string();
                changed = true;
            }
        }
    }
    changed = true;
    while changed {
        changed = false;
        for re in TRAILING_TECHNICAL.iter() {
            if let Some(m) = re.find(&s) {
                s = s[..m.start()].to_string();
                changed = true;
            }
        }
    }
    s
}

/// Silently consumes a quantifier (`?`, `+`, `*` or `{...}`) at `i`.
fn skip_quantifier(chars: &[char], i: &mut usize) {
    if *i >= chars.len() {
        return;
    }
    match chars[*i] {
        '?' | '+' | '*' => *i += 1,
        '{' => {
            while *i < chars.len() && chars[*i] != '}' {
                *i += 1;
            }
            if *i < chars.len() {
                *i += 1;
            }
        }
        _ => {}
    }
}

/// Extracts Hebrew lexeme chips from a bare pattern.
pub fn extract_semantic_chips(pattern: &str) -> SemanticResult {
    let src = strip_outer_technical(pattern);
    if src.is_empty() {
        return SemanticResult { ok: false, chips: Vec::new() };
    }

    let chars: Vec<char> = src.chars().collect();
    let mut chips: Vec<SemanticChip> = Vec::new();
    let mut i = 0usize;

    // Optional or required definite-article prefix; its quantifier is
    // consumed without being shown.
    if chars.first() == Some(&DEFINITE_ARTICLE) {
        chips.push(SemanticChip::rtl(DEFINITE_ARTICLE));
        i += 1;
        if chars.get(i) == Some(&'?') {
            i += 1;
        }
    }

    while i < chars.len() {
        let ch = chars[i];

        // Hebrew literal run.
        if is_hebrew(ch) {
            let start = i;
            while i < chars.len() && is_hebrew(chars[i]) {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            chips.push(SemanticChip::rtl(run));
            continue;
        }

        // Character class: distinct Hebrew letters joined with a separator.
        if ch == '[' {
            if let Some(end) = read_balanced(&chars, i, '[', ']') {
                let content: String = chars[i + 1..end].iter().collect();
                let mut letters: Vec<char> = Vec::new();
                for c in content.chars().filter(|c| is_hebrew(*c)) {
                    if !letters.contains(&c) {
                        letters.push(c);
                    }
                }
                if !letters.is_empty() {
                    let mut value = String::new();
                    for (idx, c) in letters.iter().enumerate() {
                        if idx > 0 {
                            value.push(CLASS_SEPARATOR);
                        }
                        value.push(*c);
                    }
                    chips.push(SemanticChip::rtl(value));
                }
                i = end + 1;
                skip_quantifier(&chars, &mut i);
                continue;
            }
            i += 1;
            continue;
        }

        // Group: alternatives joined with " | ", empty alternatives dropped.
        if ch == '(' {
            if let Some(end) = read_balanced(&chars, i, '(', ')') {
                let inner: String = chars[i + 1..end].iter().collect();
                let inner = GROUP_MARKER.replace(&inner, "").to_string();
                if inner.contains('|') {
                    let display_parts: Vec<String> = inner
                        .split('|')
                        .map(|part| hebrew_letters(part.trim()))
                        .filter(|part| !part.is_empty())
                        .collect();
                    if !display_parts.is_empty() {
                        chips.push(SemanticChip::rtl(display_parts.join(" | ")));
                    }
                } else {
                    let letters = hebrew_letters(&inner);
                    if !letters.is_empty() {
                        chips.push(SemanticChip::rtl(letters));
                    }
                }
                i = end + 1;
                skip_quantifier(&chars, &mut i);
                continue;
            }
            i += 1;
            continue;
        }

        // Escapes, anchors, alternation markers and the dot are skipped.
        if ch == '\\' {
            i += 2;
            continue;
        }
        i += 1;
    }

    let ok = chips.iter().any(|c| c.content.chars().any(is_hebrew));
    if ok {
        SemanticResult { ok: true, chips }
    } else {
        SemanticResult { ok: false, chips: Vec::new() }
    }
}
