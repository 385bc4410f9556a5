// src/lib.rs
//! # Feedgate
//!
//! `feedgate` provides the rule-matching and regex-analysis core of a
//! content-moderation pipeline for a feed of incoming text items. Every
//! incoming item is classified into one of three outcomes — publish, reject,
//! hold-for-moderation — based on a user-maintained set of keyword and regex
//! rules.
//!
//! The library is designed to be pure and stateless at its edges: matching,
//! tokenizing and highlighting are functions of their inputs, while the rule
//! collection lives behind a pluggable `RecordStore` and is mutated through
//! single-writer transactions that keep the duplicate-rule invariant atomic
//! with the write it guards.
//!
//! ## Modules
//!
//! * `rules`: The `FilterRule` data model, settings singleton, and validation.
//! * `pattern`: The pattern normalizer and matcher compilation.
//! * `display`: Presentation-only derived structures (tokens, semantic chips,
//!   highlighted segments) — a one-way interface that never feeds matching.
//! * `store`: The `FilterStore` with CRUD, bulk operations and resolution,
//!   plus the `RecordStore` backends.
//! * `errors`: The structured `FilterError` taxonomy with stable kind markers.
//!
//! ## Usage Example
//!
//! ```rust
//! use feedgate::{FilterAction, FilterInput, FilterStore, MatchType};
//!
//! fn main() -> Result<(), feedgate::FilterError> {
//!     let store = FilterStore::in_memory();
//!
//!     store.create_rule(FilterInput {
//!         keyword: "breaking".to_string(),
//!         match_type: MatchType::Substring,
//!         action: FilterAction::Reject,
//!         priority: 10,
//!         active: true,
//!         notes: None,
//!     })?;
//!
//!     assert_eq!(store.resolve_action("breaking now")?, FilterAction::Reject);
//!     // Substring matching is case-sensitive; this falls to the default.
//!     assert_eq!(
//!         store.resolve_action("BREAKING now")?,
//!         store.settings()?.default_action
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Validation failures surface synchronously from the mutating operation
//! that triggered them as `FilterError` variants with stable `kind()`
//! markers, so a presentation layer can localize them. Display paths
//! (tokenizer, semantic extractor, highlighter) never fail: malformed
//! patterns degrade to a safe fallback instead of raising.

pub mod display;
pub mod errors;
pub mod pattern;
pub mod rules;
pub mod store;

/// Re-exports the error taxonomy.
pub use errors::FilterError;

/// Re-exports the core data model.
pub use rules::{
    ensure_valid, FilterAction, FilterInput, FilterPatch, FilterRule, MatchType, Settings,
    SettingsPatch, MAX_PATTERN_LENGTH, MAX_PRIORITY, MIN_KEYWORD_LEN, MIN_PRIORITY,
};

/// Re-exports pattern normalization and matcher compilation.
pub use pattern::{compile_matcher, parse_pattern_input, ParsedPattern};

/// Re-exports the presentation-only derived structures.
pub use display::{
    extract_semantic_chips, highlight_matches, tokenize_pattern, ChipDir, HighlightOutcome,
    HighlightSegment, SemanticChip, SemanticResult, Token, TokenKind,
};

/// Re-exports the rule store, resolver and storage backends.
pub use store::{rule_matches, FilterStore, JsonFileStore, MemoryStore, RecordStore};
