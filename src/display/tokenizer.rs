//! Regex pattern tokenizer for presentation.
//!
//! Walks a bare pattern (delimiters already stripped) and emits an ordered
//! sequence of typed tokens, each carrying a short label and a tooltip for
//! rendering. The token texts concatenate back to the input exactly: every
//! character belongs to exactly one token, and every branch advances the
//! cursor, so the scan always terminates. The tokenizer never fails; an
//! unmatched `[` or `(` degrades to a one-character literal token.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The syntactic category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Boundary,
    CharClass,
    Group,
    Quantifier,
    Alternation,
    Escape,
    Literal,
}

/// One syntactic unit of a regex pattern, used only for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Original snippet for this token.
    pub text: String,
    /// Short label for a chip.
    pub label: String,
    /// Extended description.
    pub tooltip: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, label: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            label: label.into(),
            tooltip: tooltip.into(),
        }
    }
}

static BOUNDARY_LABELS: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    HashMap::from([
        ("^", ("^", "start of string")),
        ("$", ("$", "end of string")),
        ("\\b", ("\\b", "word boundary")),
        ("\\B", ("\\B", "non-word boundary")),
    ])
});

static ESCAPE_LABELS: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    HashMap::from([
        ("\\d", ("digit", "digit [0-9]")),
        ("\\D", ("not digit", "not a digit")),
        ("\\s", ("space", "whitespace")),
        ("\\S", ("not space", "not whitespace")),
        ("\\w", ("word", "word character [A-Za-z0-9_]")),
        ("\\W", ("not word", "not a word character")),
        ("\\t", ("tab", "tab")),
        ("\\n", ("newline", "newline")),
        ("\\r", ("cr", "carriage return")),
    ])
});

/// Characters that terminate a literal run.
const SPECIALS: &[char] = &['\\', '^', '$', '|', '[', ']', '(', ')', '?', '+', '*', '{', '}'];

fn is_quantifier_start(ch: char) -> bool {
    matches!(ch, '?' | '+' | '*' | '{')
}

/// Scans for the closing delimiter matching `open` at `start`, tracking
/// nesting depth and treating a backslash as escaping the following
/// character. Returns the index of the matching `close`, or `None`.
pub(crate) fn read_balanced(chars: &[char], start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut j = start;
    while j < chars.len() {
        let c = chars[j];
        if c == '\\' {
            j += 2;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
        j += 1;
    }
    None
}

struct Quantifier {
    consumed: usize,
    label: String,
    text: String,
}

fn read_quantifier(chars: &[char], i: usize) -> Quantifier {
    let ch = chars[i];
    match ch {
        '?' => return quant(1, "optional", "?"),
        '+' => return quant(1, "1+ times", "+"),
        '*' => return quant(1, "0+ times", "*"),
        _ => {}
    }
    if ch == '{' {
        let mut j = i + 1;
        while j < chars.len() && chars[j] != '}' {
            j += 1;
        }
        if j < chars.len() {
            let content: String = chars[i + 1..j].iter().collect();
            let label = match content.split_once(',') {
                None => format!("exactly {content}"),
                Some(("", max)) => format!("up to {max}"),
                Some((min, "")) => format!("at least {min}"),
                Some((min, max)) => format!("from {min} to {max}"),
            };
            return Quantifier {
                consumed: j - i + 1,
                label,
                text: format!("{{{content}}}"),
            };
        }
    }
    quant(1, "quantifier", ch)
}

fn quant(consumed: usize, label: impl Into<String>, text: impl ToString) -> Quantifier {
    Quantifier {
        consumed,
        label: label.into(),
        text: text.to_string(),
    }
}

fn push_quantifier_if_present(tokens: &mut Vec<Token>, chars: &[char], i: &mut usize) {
    if *i < chars.len() && is_quantifier_start(chars[*i]) {
        let q = read_quantifier(chars, *i);
        tokens.push(Token::new(TokenKind::Quantifier, q.text, q.label, "quantifier"));
        *i += q.consumed;
    }
}

/// Tokenizes a bare regex pattern into an ordered token sequence.
pub fn tokenize_pattern(pattern: &str) -> Vec<Token> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i];

        // Escaped sequences, including word boundaries and \p{...} classes.
        if ch == '\\' {
            let next = chars.get(i + 1).copied();
            let esc: String = match next {
                Some(c) => format!("\\{c}"),
                None => "\\".to_string(),
            };
            if let Some((label, tooltip)) = BOUNDARY_LABELS.get(esc.as_str()) {
                tokens.push(Token::new(TokenKind::Boundary, esc, *label, *tooltip));
                i += 2;
                continue;
            }
            if let Some((label, tooltip)) = ESCAPE_LABELS.get(esc.as_str()) {
                tokens.push(Token::new(TokenKind::Escape, esc, *label, *tooltip));
                i += 2;
                continue;
            }
            if matches!(next, Some('p') | Some('P')) && chars.get(i + 2) == Some(&'{') {
                let mut j = i + 3;
                while j < chars.len() && chars[j] != '}' {
                    j += 1;
                }
                if j < chars.len() {
                    let body: String = chars[i..=j].iter().collect();
                    let negated = next == Some('P');
                    let label = if negated { "\\P{…}" } else { "\\p{…}" };
                    let tooltip = if negated {
                        "Negated Unicode property class"
                    } else {
                        "Unicode property class"
                    };
                    tokens.push(Token::new(TokenKind::CharClass, body, label, tooltip));
                    i = j + 1;
                    continue;
                }
            }
            // Generic escape fallback.
            let advance = if next.is_some() { 2 } else { 1 };
            tokens.push(Token::new(TokenKind::Escape, esc.clone(), esc, "escaped char"));
            i += advance;
            continue;
        }

        // Anchors.
        if ch == '^' || ch == '$' {
            let key = ch.to_string();
            let (label, tooltip) = BOUNDARY_LABELS[key.as_str()];
            tokens.push(Token::new(TokenKind::Boundary, key, label, tooltip));
            i += 1;
            continue;
        }

        // Alternation.
        if ch == '|' {
            tokens.push(Token::new(TokenKind::Alternation, "|", "|", "alternation"));
            i += 1;
            continue;
        }

        // Character class [ ... ], with a trailing quantifier absorbed into
        // a following quantifier token.
        if ch == '[' {
            if let Some(end) = read_balanced(&chars, i, '[', ']') {
                let text: String = chars[i..=end].iter().collect();
                tokens.push(Token::new(TokenKind::CharClass, text, "[]", "character class"));
                i = end + 1;
                push_quantifier_if_present(&mut tokens, &chars, &mut i);
                continue;
            }
            // Unmatched [ falls through to the literal fallback.
        }

        // Group ( ... ), including lookarounds.
        if ch == '(' {
            if let Some(end) = read_balanced(&chars, i, '(', ')') {
                let text: String = chars[i..=end].iter().collect();
                let (label, tooltip) = if text.starts_with("(?=") {
                    ("lookahead", "positive lookahead")
                } else if text.starts_with("(?!") {
                    ("nlookahead", "negative lookahead")
                } else if text.starts_with("(?<=") {
                    ("lookbehind", "positive lookbehind")
                } else if text.starts_with("(?<!") {
                    ("nlookbehind", "negative lookbehind")
                } else if text.starts_with("(?:") {
                    ("?:", "non-capturing group")
                } else {
                    ("()", "group")
                };
                tokens.push(Token::new(TokenKind::Group, text, label, tooltip));
                i = end + 1;
                push_quantifier_if_present(&mut tokens, &chars, &mut i);
                continue;
            }
            // Unmatched ( falls through to the literal fallback.
        }

        // Bare quantifier attaching to whatever preceded it.
        if is_quantifier_start(ch) {
            let q = read_quantifier(&chars, i);
            tokens.push(Token::new(TokenKind::Quantifier, q.text, q.label, "quantifier"));
            i += q.consumed;
            continue;
        }

        // Literal run up to the next special character.
        let mut j = i;
        while j < chars.len() && !SPECIALS.contains(&chars[j]) {
            j += 1;
        }
        if j > i {
            let lit: String = chars[i..j].iter().collect();
            tokens.push(Token::new(TokenKind::Literal, lit.clone(), lit, "literal text"));
            i = j;
            push_quantifier_if_present(&mut tokens, &chars, &mut i);
            continue;
        }

        // Fallback: consume a single character (unmatched delimiter etc.).
        let single = ch.to_string();
        tokens.push(Token::new(TokenKind::Literal, single.clone(), single, "char"));
        i += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn token_texts_cover_the_input_exactly() {
        let patterns = [
            "(cat|dog)s?",
            "^\\bפרס\\b$",
            "[abc]+x{2,5}",
            "\\p{L}+",
            "a(b(c|d)e)f",
            "(unclosed[also",
            "plain literal",
            "",
            "\\",
        ];
        for p in patterns {
            assert_eq!(concat(&tokenize_pattern(p)), p, "coverage failed for {p:?}");
        }
    }

    #[test]
    fn capturing_group_with_outside_quantifier() {
        // The s? is outside the group: a literal token then a quantifier token.
        let tokens = tokenize_pattern("(cat|dog)s?");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Group);
        assert_eq!(tokens[0].label, "()");
        assert_eq!(tokens[1].kind, TokenKind::Literal);
        assert_eq!(tokens[1].text, "s");
        assert_eq!(tokens[2].kind, TokenKind::Quantifier);
        assert_eq!(tokens[2].text, "?");
        assert_eq!(tokens[2].label, "optional");
    }

    #[test]
    fn lookaround_groups_are_labeled() {
        assert_eq!(tokenize_pattern("(?=x)")[0].label, "lookahead");
        assert_eq!(tokenize_pattern("(?!x)")[0].label, "nlookahead");
        assert_eq!(tokenize_pattern("(?<=x)")[0].label, "lookbehind");
        assert_eq!(tokenize_pattern("(?<!x)")[0].label, "nlookbehind");
        assert_eq!(tokenize_pattern("(?:x)")[0].label, "?:");
    }

    #[test]
    fn known_escapes_get_readable_labels() {
        let tokens = tokenize_pattern("\\d\\w\\q");
        assert_eq!(tokens[0].label, "digit");
        assert_eq!(tokens[1].label, "word");
        // Unrecognized escape falls back to the generic form.
        assert_eq!(tokens[2].label, "\\q");
        assert_eq!(tokens[2].tooltip, "escaped char");
    }

    #[test]
    fn word_boundaries_are_boundary_tokens() {
        let tokens = tokenize_pattern("\\bab\\B");
        assert_eq!(tokens[0].kind, TokenKind::Boundary);
        assert_eq!(tokens[0].tooltip, "word boundary");
        assert_eq!(tokens[2].kind, TokenKind::Boundary);
        assert_eq!(tokens[2].tooltip, "non-word boundary");
    }

    #[test]
    fn unicode_property_class_is_one_token() {
        let tokens = tokenize_pattern("\\p{Hebrew}+");
        assert_eq!(tokens[0].kind, TokenKind::CharClass);
        assert_eq!(tokens[0].text, "\\p{Hebrew}");
        assert_eq!(tokens[0].label, "\\p{…}");
        assert_eq!(tokens[1].kind, TokenKind::Quantifier);
    }

    #[test]
    fn brace_quantifier_wording() {
        assert_eq!(tokenize_pattern("a{3}")[1].label, "exactly 3");
        assert_eq!(tokenize_pattern("a{2,}")[1].label, "at least 2");
        assert_eq!(tokenize_pattern("a{,5}")[1].label, "up to 5");
        assert_eq!(tokenize_pattern("a{2,5}")[1].label, "from 2 to 5");
    }

    #[test]
    fn class_quantifier_is_adjacent_not_absorbed() {
        let tokens = tokenize_pattern("[abc]+");
        assert_eq!(tokens[0].kind, TokenKind::CharClass);
        assert_eq!(tokens[0].text, "[abc]");
        assert_eq!(tokens[1].kind, TokenKind::Quantifier);
        assert_eq!(tokens[1].text, "+");
    }

    #[test]
    fn escaped_bracket_does_not_close_a_class() {
        let tokens = tokenize_pattern("[a\\]b]");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "[a\\]b]");
    }

    #[test]
    fn unmatched_delimiters_degrade_to_literals() {
        let tokens = tokenize_pattern("(ab");
        assert_eq!(tokens[0].kind, TokenKind::Literal);
        assert_eq!(tokens[0].text, "(");
        assert_eq!(tokens[1].text, "ab");

        let tokens = tokenize_pattern("[ab");
        assert_eq!(tokens[0].kind, TokenKind::Literal);
        assert_eq!(tokens[0].text, "[");
    }

    #[test]
    fn alternation_and_anchors() {
        let tokens = tokenize_pattern("^a|b$");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Boundary,
                TokenKind::Literal,
                TokenKind::Alternation,
                TokenKind::Literal,
                TokenKind::Boundary,
            ]
        );
    }
}
