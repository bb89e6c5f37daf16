//! Lemma extraction and snippet building
//!
//! This module turns page markup into lemma counts and builds highlighted
//! excerpts for search results.

mod finder;
mod snippet;

pub use finder::{strip_tags, words, LemmaFinder, FUNCTION_WORD_TAGS};
pub use snippet::build_snippet;

/// Marker placed between and after snippet fragments
pub const ELLIPSIS: &str = ". . .";
