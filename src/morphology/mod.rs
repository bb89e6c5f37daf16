//! Morphology capability
//!
//! Lemma extraction depends on a morphological analyser that maps a word to
//! its dictionary form and grammatical class. The analyser is injected as a
//! `Morphology` trait object per language; `WordListMorphology` is the
//! rule-based implementation shipped with the crate.

mod word_list;

pub use word_list::WordListMorphology;

use std::fmt;
use thiserror::Error;

/// Languages with a morphology implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian,
    English,
}

impl Language {
    /// Returns true if `c` belongs to the language's alphabet
    pub fn is_letter(&self, c: char) -> bool {
        match self {
            Self::Russian => matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё'),
            Self::English => c.is_ascii_alphabetic(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Russian => write!(f, "russian"),
            Self::English => write!(f, "english"),
        }
    }
}

/// Returns true if `c` is a letter of any supported alphabet
pub fn is_word_char(c: char) -> bool {
    Language::Russian.is_letter(c) || Language::English.is_letter(c)
}

/// Errors raised by a morphology implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MorphologyError {
    /// The word contains characters the language variant cannot analyse
    #[error("'{word}' cannot be analysed as {language}")]
    UnsupportedCharset { word: String, language: Language },
}

/// A morphological analyser for one language
pub trait Morphology: Send + Sync {
    /// The language this analyser handles
    fn language(&self) -> Language;

    /// Returns candidate normal forms of a lowercase word, best first
    fn normal_forms(&self, word: &str) -> Result<Vec<String>, MorphologyError>;

    /// Returns the grammatical classification of a normal form
    fn morph_info(&self, normal_form: &str) -> Result<String, MorphologyError>;
}
