// tests/resolution_tests.rs
//! Tests for action resolution: priority selection, tie-breaking,
//! determinism, and graceful handling of corrupt stored rules.

use anyhow::Result;
use chrono::Utc;
use test_log::test;
use feedgate::{
    FilterAction, FilterInput, FilterRule, FilterStore, MatchType, MemoryStore, RecordStore,
    SettingsPatch,
};
use uuid::Uuid;

fn input(keyword: &str, action: FilterAction, priority: i32) -> FilterInput {
    FilterInput {
        keyword: keyword.to_string(),
        match_type: MatchType::Substring,
        action,
        priority,
        active: true,
        notes: None,
    }
}

#[test]
fn substring_resolution_is_case_sensitive() -> Result<()> {
    let store = FilterStore::in_memory();
    store.update_settings(SettingsPatch {
        default_action: Some(FilterAction::Publish),
    })?;
    store.create_rule(input("breaking", FilterAction::Reject, 10))?;

    assert_eq!(store.resolve_action("breaking now")?, FilterAction::Reject);
    assert_eq!(store.resolve_action("BREAKING now")?, FilterAction::Publish);
    Ok(())
}

#[test]
fn highest_priority_rule_wins() -> Result<()> {
    let store = FilterStore::in_memory();
    store.create_rule(input("war", FilterAction::Moderation, 5))?;
    let mut regex_rule = input("w.r", FilterAction::Reject, 9);
    regex_rule.match_type = MatchType::Regex;
    store.create_rule(regex_rule)?;

    assert_eq!(store.resolve_action("war report")?, FilterAction::Reject);
    Ok(())
}

#[test]
fn priority_ties_go_to_the_first_stored_rule() -> Result<()> {
    let store = FilterStore::in_memory();
    store.create_rule(input("aa", FilterAction::Reject, 5))?;
    store.create_rule(input("bb", FilterAction::Moderation, 5))?;

    assert_eq!(store.resolve_action("aa and bb")?, FilterAction::Reject);
    Ok(())
}

#[test]
fn inactive_rules_are_ignored() -> Result<()> {
    let store = FilterStore::in_memory();
    store.update_settings(SettingsPatch {
        default_action: Some(FilterAction::Publish),
    })?;
    let mut rule = input("war", FilterAction::Reject, 5);
    rule.active = false;
    store.create_rule(rule)?;

    assert_eq!(store.resolve_action("war report")?, FilterAction::Publish);
    Ok(())
}

#[test]
fn resolution_is_deterministic() -> Result<()> {
    let store = FilterStore::in_memory();
    store.create_rule(input("war", FilterAction::Reject, 5))?;
    store.create_rule(input("report", FilterAction::Moderation, 5))?;

    let first = store.resolve_action("war report")?;
    for _ in 0..10 {
        assert_eq!(store.resolve_action("war report")?, first);
    }
    Ok(())
}

#[test]
fn default_action_applies_when_nothing_matches() -> Result<()> {
    let store = FilterStore::in_memory();
    store.create_rule(input("war", FilterAction::Reject, 5))?;
    assert_eq!(store.resolve_action("sunny weather")?, FilterAction::Moderation);
    Ok(())
}

#[test]
fn corrupt_stored_regex_does_not_abort_resolution() -> Result<()> {
    // A rule with an uncompilable regex can only exist through data
    // corruption; the resolver must treat it as non-matching and keep
    // evaluating the rest of the set.
    let backend = MemoryStore::default();
    let now = Utc::now();
    backend.save(&[
        FilterRule {
            id: Uuid::new_v4(),
            keyword: "(unclosed".to_string(),
            match_type: MatchType::Regex,
            action: FilterAction::Publish,
            priority: 100,
            active: true,
            notes: None,
            updated_at: now,
        },
        FilterRule {
            id: Uuid::new_v4(),
            keyword: "war".to_string(),
            match_type: MatchType::Substring,
            action: FilterAction::Reject,
            priority: 1,
            active: true,
            notes: None,
            updated_at: now,
        },
    ])?;

    let store = FilterStore::new(Box::new(backend));
    assert_eq!(store.resolve_action("war report")?, FilterAction::Reject);
    Ok(())
}

#[test]
fn regex_rules_resolve_through_the_normalizer() -> Result<()> {
    let store = FilterStore::in_memory();
    store.update_settings(SettingsPatch {
        default_action: Some(FilterAction::Publish),
    })?;
    let mut rule = input("/breaking/i", FilterAction::Moderation, 5);
    rule.match_type = MatchType::Regex;
    store.create_rule(rule)?;

    assert_eq!(store.resolve_action("BREAKING now")?, FilterAction::Moderation);
    assert_eq!(store.resolve_action("quiet day")?, FilterAction::Publish);
    Ok(())
}
