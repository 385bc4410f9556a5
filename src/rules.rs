//! Data model for moderation filter rules.
//!
//! This module defines the core records the engine operates on: the
//! `FilterRule` itself, the create/patch payloads used by the store, the
//! singleton `Settings` record, and the validation routine (`ensure_valid`)
//! applied on every mutating operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FilterError;
use crate::pattern::{compile_matcher, parse_pattern_input};

/// Minimum keyword length, counted in characters after trimming.
pub const MIN_KEYWORD_LEN: usize = 2;
/// Inclusive priority bounds. Higher priority wins on conflict.
pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 1000;
/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The moderation outcome a rule applies when it wins resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Publish,
    Reject,
    Moderation,
}

/// How a rule's keyword is interpreted against a candidate text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Case-sensitive substring containment.
    #[default]
    Substring,
    /// Regular expression, evaluated through the pattern normalizer.
    Regex,
}

/// A single moderation filter rule.
///
/// Stored records may predate the `match_type`/`active` fields, so both
/// deserialize with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Unique identifier, assigned at creation, immutable.
    pub id: Uuid,
    /// The phrase or pattern this rule looks for.
    pub keyword: String,
    #[serde(default)]
    pub match_type: MatchType,
    /// The outcome applied when this rule wins.
    pub action: FilterAction,
    /// Integer in [1, 1000]; higher wins on conflict.
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Optional free-text annotation, no semantic effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set on every create/update.
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Payload for creating a new rule. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterInput {
    pub keyword: String,
    #[serde(default)]
    pub match_type: MatchType,
    pub action: FilterAction,
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for an existing rule; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
    pub keyword: Option<String>,
    pub match_type: Option<MatchType>,
    pub action: Option<FilterAction>,
    pub priority: Option<i32>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

impl FilterPatch {
    /// Merges this patch onto an existing record, producing the candidate
    /// input that must pass validation before being committed.
    pub fn apply_to(&self, rule: &FilterRule) -> FilterInput {
        FilterInput {
            keyword: self.keyword.clone().unwrap_or_else(|| rule.keyword.clone()),
            match_type: self.match_type.unwrap_or(rule.match_type),
            action: self.action.unwrap_or(rule.action),
            priority: self.priority.unwrap_or(rule.priority),
            active: self.active.unwrap_or(rule.active),
            notes: self.notes.clone().or_else(|| rule.notes.clone()),
        }
    }
}

/// Singleton engine settings: the action applied when no active rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub default_action: FilterAction,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_action: FilterAction::Moderation,
        }
    }
}

/// Partial update for the settings singleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub default_action: Option<FilterAction>,
}

/// Validates a prospective rule against the invariants and the current rule
/// set. `self_id` excludes the record being updated from the duplicate check.
///
/// Checks, in order: trimmed keyword length, priority range, regex
/// compilability for regex-type keywords, and the active-duplicate invariant
/// on `(keyword, match_type)`.
pub fn ensure_valid(
    input: &FilterInput,
    existing: &[FilterRule],
    self_id: Option<Uuid>,
) -> Result<(), FilterError> {
    let keyword = input.keyword.trim();
    if keyword.chars().count() < MIN_KEYWORD_LEN {
        return Err(FilterError::KeywordRequired);
    }
    if input.priority < MIN_PRIORITY || input.priority > MAX_PRIORITY {
        return Err(FilterError::PriorityRange(input.priority as i64));
    }
    if input.match_type == MatchType::Regex {
        if keyword.len() > MAX_PATTERN_LENGTH {
            return Err(FilterError::PatternLengthExceeded(keyword.len()));
        }
        let parsed = parse_pattern_input(keyword);
        if let Err(e) = compile_matcher(&parsed) {
            return Err(match e {
                FilterError::InvalidPattern(source) => FilterError::InvalidRegex(source),
                other => other,
            });
        }
    }
    if input.active {
        let duplicate = existing.iter().any(|rule| {
            rule.active
                && rule.keyword == keyword
                && rule.match_type == input.match_type
                && Some(rule.id) != self_id
        });
        if duplicate {
            return Err(FilterError::DuplicateActiveRule);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(keyword: &str, priority: i32) -> FilterInput {
        FilterInput {
            keyword: keyword.to_string(),
            match_type: MatchType::Substring,
            action: FilterAction::Reject,
            priority,
            active: true,
            notes: None,
        }
    }

    fn stored(keyword: &str, match_type: MatchType, active: bool) -> FilterRule {
        FilterRule {
            id: Uuid::new_v4(),
            keyword: keyword.to_string(),
            match_type,
            action: FilterAction::Reject,
            priority: 10,
            active,
            notes: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn short_keyword_is_rejected() {
        let err = ensure_valid(&input("  a  ", 5), &[], None).unwrap_err();
        assert_eq!(err.kind(), "keyword:required");
    }

    #[test]
    fn priority_bounds_are_inclusive() {
        assert!(ensure_valid(&input("ab", 1), &[], None).is_ok());
        assert!(ensure_valid(&input("ab", 1000), &[], None).is_ok());
        assert_eq!(
            ensure_valid(&input("ab", 0), &[], None).unwrap_err().kind(),
            "priority:range"
        );
        assert_eq!(
            ensure_valid(&input("ab", 1001), &[], None).unwrap_err().kind(),
            "priority:range"
        );
    }

    #[test]
    fn invalid_regex_keyword_is_rejected() {
        let mut bad = input("(unclosed", 5);
        bad.match_type = MatchType::Regex;
        assert_eq!(
            ensure_valid(&bad, &[], None).unwrap_err().kind(),
            "regex:invalid"
        );
    }

    #[test]
    fn duplicate_check_ignores_inactive_rules() {
        let existing = vec![stored("war", MatchType::Substring, false)];
        assert!(ensure_valid(&input("war", 5), &existing, None).is_ok());
    }

    #[test]
    fn duplicate_check_ignores_self() {
        let existing = vec![stored("war", MatchType::Substring, true)];
        let self_id = existing[0].id;
        assert!(ensure_valid(&input("war", 5), &existing, Some(self_id)).is_ok());
        assert_eq!(
            ensure_valid(&input("war", 5), &existing, None).unwrap_err().kind(),
            "duplicate:active"
        );
    }

    #[test]
    fn same_keyword_different_match_type_is_allowed() {
        let existing = vec![stored("war", MatchType::Substring, true)];
        let mut candidate = input("war", 5);
        candidate.match_type = MatchType::Regex;
        assert!(ensure_valid(&candidate, &existing, None).is_ok());
    }
}
