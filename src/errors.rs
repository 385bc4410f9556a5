//! errors.rs - Custom error types for the feedgate library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Every validation variant carries a stable machine-readable kind marker
//! so a presentation layer can map it to a localized message without
//! parsing the display text.

use thiserror::Error;
use uuid::Uuid;

/// This enum represents all possible error types in the `feedgate` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FilterError {
    #[error("keyword must be at least {min} characters after trimming", min = crate::rules::MIN_KEYWORD_LEN)]
    KeywordRequired,

    #[error("priority {0} is outside the allowed range [{min}, {max}]", min = crate::rules::MIN_PRIORITY, max = crate::rules::MAX_PRIORITY)]
    PriorityRange(i64),

    #[error("keyword is not a valid regular expression: {0}")]
    InvalidRegex(#[source] regex::Error),

    #[error("pattern length ({0}) exceeds maximum allowed ({max})", max = crate::rules::MAX_PATTERN_LENGTH)]
    PatternLengthExceeded(usize),

    #[error("an active rule with the same keyword and match type already exists")]
    DuplicateActiveRule,

    #[error("no rule found with id {0}")]
    NotFound(Uuid),

    #[error("failed to build a matcher from the pattern: {0}")]
    InvalidPattern(#[source] regex::Error),

    #[error("failed to serialize or deserialize stored records: {0}")]
    Serialization(String),

    #[error("an unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Returns the stable kind marker for this error.
    ///
    /// These markers are part of the public contract: presentation layers
    /// key their localized validation messages off them.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::KeywordRequired => "keyword:required",
            FilterError::PriorityRange(_) => "priority:range",
            FilterError::InvalidRegex(_) => "regex:invalid",
            FilterError::PatternLengthExceeded(_) => "regex:invalid",
            FilterError::DuplicateActiveRule => "duplicate:active",
            FilterError::NotFound(_) => "notfound",
            FilterError::InvalidPattern(_) => "pattern:invalid",
            FilterError::Serialization(_) => "storage:serialization",
            FilterError::Io(_) => "storage:io",
        }
    }
}
