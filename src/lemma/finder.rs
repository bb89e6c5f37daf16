//! Lemma finder
//!
//! Strips markup from page content, splits the visible text into word
//! runs and maps every content word to its normal form. Function words are
//! dropped based on the grammatical tag the morphology reports.

use crate::morphology::{is_word_char, Morphology, WordListMorphology};
use scraper::Html;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Grammatical tags of word classes that never become lemmas
pub const FUNCTION_WORD_TAGS: &[&str] = &[
    "МЕЖД", "ПРЕДЛ", "СОЮЗ", "ВВОДН", "ЧАСТ", "МС", "CONJ", "PART", "PREP", "PN", "INT",
];

/// Elements whose text is never visible
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts lemmas from text using a Russian and an English analyser
///
/// Each word is analysed as Russian first. If the Russian analyser rejects
/// its characters the English analyser is tried; words neither accepts are
/// skipped.
#[derive(Clone)]
pub struct LemmaFinder {
    russian: Arc<dyn Morphology>,
    english: Arc<dyn Morphology>,
}

impl LemmaFinder {
    /// Creates a finder from two injected analysers
    pub fn new(russian: Arc<dyn Morphology>, english: Arc<dyn Morphology>) -> Self {
        Self { russian, english }
    }

    /// Creates a finder backed by the built-in word-list analysers
    pub fn with_word_lists() -> Self {
        Self::new(
            Arc::new(WordListMorphology::russian()),
            Arc::new(WordListMorphology::english()),
        )
    }

    /// Counts the lemmas of an HTML document
    pub fn find_all_lemmas(&self, html: &str) -> HashMap<String, usize> {
        self.count_lemmas(&strip_tags(html))
    }

    /// Counts the lemmas of plain text
    pub fn count_lemmas(&self, text: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for word in words(text) {
            if let Some(lemma) = self.lemma_of(word) {
                *counts.entry(lemma).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns the distinct lemmas of `text` in order of first appearance
    pub fn lemma_set(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut lemmas = Vec::new();
        for word in words(text) {
            if let Some(lemma) = self.lemma_of(word) {
                if seen.insert(lemma.clone()) {
                    lemmas.push(lemma);
                }
            }
        }
        lemmas
    }

    /// Returns the lemma of a single word, or None for function words and
    /// words no analyser accepts
    pub fn lemma_of(&self, word: &str) -> Option<String> {
        let (normal_form, info) = self.analyse(word)?;
        if is_function_word(&info) {
            return None;
        }
        Some(normal_form)
    }

    /// Returns the normal form of a word without filtering by word class
    pub fn normal_form(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        [&self.russian, &self.english]
            .into_iter()
            .find_map(|morphology| first_normal_form(morphology.as_ref(), &lower))
    }

    fn analyse(&self, word: &str) -> Option<(String, String)> {
        let lower = word.to_lowercase();

        for morphology in [&self.russian, &self.english] {
            let Some(normal_form) = first_normal_form(morphology.as_ref(), &lower) else {
                continue;
            };
            match morphology.morph_info(&normal_form) {
                Ok(info) => return Some((normal_form, info)),
                Err(e) => {
                    tracing::debug!(
                        "No {} morphology info for {}: {}",
                        morphology.language(),
                        normal_form,
                        e
                    );
                }
            }
        }

        tracing::warn!("Skipping unclassifiable word {}", lower);
        None
    }
}

impl Default for LemmaFinder {
    fn default() -> Self {
        Self::with_word_lists()
    }
}

fn first_normal_form(morphology: &dyn Morphology, word: &str) -> Option<String> {
    morphology
        .normal_forms(word)
        .ok()
        .and_then(|forms| forms.into_iter().next())
}

/// Returns true if a morphology info string carries a function-word tag
///
/// Info strings have the form `normal_form|TAG [TAG...]`.
fn is_function_word(info: &str) -> bool {
    let tags = info.rsplit('|').next().unwrap_or(info);
    tags.split_whitespace()
        .any(|tag| FUNCTION_WORD_TAGS.contains(&tag))
}

/// Splits text into maximal runs of letters from the supported alphabets
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
}

/// Returns the visible text of an HTML document with whitespace collapsed
///
/// Text nodes are separated by a space, so words in adjacent elements
/// never merge.
pub fn strip_tags(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut fragments = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let invisible = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .map(|element| INVISIBLE_ELEMENTS.contains(&element.name()))
            .unwrap_or(false);
        if invisible {
            continue;
        }

        let text: &str = text;
        fragments.push(text);
    }

    fragments
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
