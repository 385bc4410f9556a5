//! Presentation-only derived structures.
//!
//! Everything in this module is a one-way interface: functions consume a
//! pattern (and, for highlighting, a candidate text) and produce display
//! values. Nothing here feeds back into resolution — matching always goes
//! through the pattern normalizer directly.

pub mod highlight;
pub mod semantic;
pub mod tokenizer;

pub use highlight::{highlight_matches, HighlightOutcome, HighlightSegment};
pub use semantic::{extract_semantic_chips, ChipDir, SemanticChip, SemanticResult};
pub use tokenizer::{tokenize_pattern, Token, TokenKind};
