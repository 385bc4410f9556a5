//! Rule store and action resolver.
//!
//! `FilterStore` owns the rule set and the default fallback action. Every
//! mutating operation is a single-writer transaction: it takes the internal
//! write lock, re-reads the full current state through the backend,
//! validates the prospective new state against the whole collection, and
//! commits atomically. This keeps the duplicate-invariant check and the
//! write it guards atomic even with concurrent callers. Read-only
//! operations are pure functions of the current snapshot.

pub mod backend;

use std::sync::Mutex;

use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use crate::errors::FilterError;
use crate::pattern::{compile_matcher, parse_pattern_input};
use crate::rules::{
    ensure_valid, FilterAction, FilterInput, FilterPatch, FilterRule, MatchType, Settings,
    SettingsPatch,
};

pub use backend::{JsonFileStore, MemoryStore, RecordStore};

/// The shared matching primitive: decides whether a single keyword matches
/// a text. Substring keywords use case-sensitive containment; regex
/// keywords go through the pattern normalizer, and a keyword that fails to
/// compile is treated as non-matching rather than an error.
pub fn rule_matches(text: &str, keyword: &str, match_type: MatchType) -> bool {
    match match_type {
        MatchType::Substring => text.contains(keyword),
        MatchType::Regex => {
            let parsed = parse_pattern_input(keyword);
            match compile_matcher(&parsed) {
                Ok(matcher) => matcher.is_match(text),
                Err(e) => {
                    warn!("Stored regex keyword no longer compiles, treating as non-matching: {e}");
                    false
                }
            }
        }
    }
}

/// Owns the rule collection and resolves moderation actions for texts.
pub struct FilterStore {
    backend: Box<dyn RecordStore>,
    write_lock: Mutex<()>,
}

impl FilterStore {
    pub fn new(backend: Box<dyn RecordStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Convenience constructor over a volatile in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    /// Returns the current rule set.
    pub fn list_rules(&self) -> Result<Vec<FilterRule>, FilterError> {
        self.backend.load()
    }

    /// Validates the input, assigns an id and timestamp, and appends the
    /// new rule.
    pub fn create_rule(&self, input: FilterInput) -> Result<FilterRule, FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut rules = self.backend.load()?;
        ensure_valid(&input, &rules, None)?;
        let rule = FilterRule {
            id: Uuid::new_v4(),
            keyword: input.keyword.trim().to_string(),
            match_type: input.match_type,
            action: input.action,
            priority: input.priority,
            active: input.active,
            notes: input.notes,
            updated_at: Utc::now(),
        };
        debug!("Creating rule {} ({:?} keyword)", rule.id, rule.match_type);
        rules.push(rule.clone());
        self.backend.save(&rules)?;
        Ok(rule)
    }

    /// Merges the patch onto the existing record, re-validates the merged
    /// result excluding the record itself from duplicate checks, and
    /// persists it.
    pub fn update_rule(&self, id: Uuid, patch: FilterPatch) -> Result<FilterRule, FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut rules = self.backend.load()?;
        let idx = rules
            .iter()
            .position(|r| r.id == id)
            .ok_or(FilterError::NotFound(id))?;
        let merged = patch.apply_to(&rules[idx]);
        ensure_valid(&merged, &rules, Some(id))?;
        let updated = FilterRule {
            id,
            keyword: merged.keyword.trim().to_string(),
            match_type: merged.match_type,
            action: merged.action,
            priority: merged.priority,
            active: merged.active,
            notes: merged.notes,
            updated_at: Utc::now(),
        };
        debug!("Updating rule {id}");
        rules[idx] = updated.clone();
        self.backend.save(&rules)?;
        Ok(updated)
    }

    /// Removes the rule if present; removing an absent id is a no-op.
    pub fn delete_rule(&self, id: Uuid) -> Result<(), FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut rules = self.backend.load()?;
        rules.retain(|r| r.id != id);
        self.backend.save(&rules)?;
        Ok(())
    }

    /// Flips the active flag on every listed rule, all-or-nothing.
    ///
    /// When activating, each affected record is re-validated against the
    /// working state as earlier flips take effect, so two inactive
    /// duplicates cannot both be activated in one call. The first failure
    /// aborts the whole operation with no partial commit.
    pub fn bulk_set_active(&self, ids: &[Uuid], active: bool) -> Result<(), FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut rules = self.backend.load()?;
        let now = Utc::now();
        for i in 0..rules.len() {
            if !ids.contains(&rules[i].id) {
                continue;
            }
            if active {
                let candidate = FilterInput {
                    keyword: rules[i].keyword.clone(),
                    match_type: rules[i].match_type,
                    action: rules[i].action,
                    priority: rules[i].priority,
                    active: true,
                    notes: rules[i].notes.clone(),
                };
                ensure_valid(&candidate, &rules, Some(rules[i].id))?;
            }
            rules[i].active = active;
            rules[i].updated_at = now;
        }
        debug!("Bulk set active={active} on {} rule(s)", ids.len());
        self.backend.save(&rules)?;
        Ok(())
    }

    /// Removes every listed rule in one transaction.
    pub fn bulk_delete(&self, ids: &[Uuid]) -> Result<(), FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut rules = self.backend.load()?;
        rules.retain(|r| !ids.contains(&r.id));
        self.backend.save(&rules)?;
        Ok(())
    }

    /// Returns the settings singleton.
    pub fn settings(&self) -> Result<Settings, FilterError> {
        self.backend.load_settings()
    }

    /// Applies a partial update to the settings singleton.
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, FilterError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut settings = self.backend.load_settings()?;
        if let Some(action) = patch.default_action {
            settings.default_action = action;
        }
        self.backend.save_settings(&settings)?;
        Ok(settings)
    }

    /// Resolves the moderation action for a candidate text.
    ///
    /// Evaluates the text against every active rule; among matching rules
    /// the strictly greatest priority wins, ties broken by the first rule
    /// encountered in stored order. A rule whose regex no longer compiles
    /// is treated as non-matching. Falls back to the settings default when
    /// nothing matches.
    pub fn resolve_action(&self, text: &str) -> Result<FilterAction, FilterError> {
        let rules = self.backend.load()?;
        let mut winner: Option<&FilterRule> = None;
        for rule in rules.iter().filter(|r| r.active) {
            if !rule_matches(text, &rule.keyword, rule.match_type) {
                continue;
            }
            match winner {
                Some(current) if rule.priority > current.priority => winner = Some(rule),
                None => winner = Some(rule),
                _ => {}
            }
        }
        match winner {
            Some(rule) => {
                debug!("Text resolved by rule {} -> {:?}", rule.id, rule.action);
                Ok(rule.action)
            }
            None => Ok(self.backend.load_settings()?.default_action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matching_is_case_sensitive() {
        assert!(rule_matches("breaking now", "breaking", MatchType::Substring));
        assert!(!rule_matches("BREAKING now", "breaking", MatchType::Substring));
    }

    #[test]
    fn regex_matching_goes_through_the_normalizer() {
        assert!(rule_matches("cats!", "(cat|dog)s?", MatchType::Regex));
        assert!(rule_matches("Cats!", "/cats/i", MatchType::Regex));
    }

    #[test]
    fn broken_regex_keyword_never_matches() {
        assert!(!rule_matches("anything", "(unclosed", MatchType::Regex));
    }
}
