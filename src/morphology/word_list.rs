//! Rule-based morphology backed by closed-class word lists
//!
//! Function words (conjunctions, prepositions, pronouns, particles,
//! interjections, introductory words) are recognised from fixed lists and
//! tagged with their class. Every other word is treated as a content word.
//! Normal forms are produced by a handful of inflection rules, which is
//! enough to fold simple plurals and spelling variants together.

use crate::morphology::{Language, Morphology, MorphologyError};
use std::collections::HashMap;

const RUSSIAN_CONJUNCTIONS: &[&str] = &[
    "и", "а", "но", "или", "либо", "что", "чтобы", "если", "когда", "хотя", "потому", "поэтому",
    "однако", "зато", "также", "тоже", "будто", "словно",
];
const RUSSIAN_PREPOSITIONS: &[&str] = &[
    "в", "во", "на", "с", "со", "к", "ко", "по", "о", "об", "обо", "от", "до", "из", "у", "за",
    "над", "под", "при", "про", "для", "без", "через", "между", "перед", "около", "среди",
];
const RUSSIAN_PRONOUNS: &[&str] = &[
    "я", "ты", "он", "она", "оно", "мы", "вы", "они", "меня", "тебя", "его", "ее", "нас", "вас",
    "их", "мой", "твой", "свой", "наш", "ваш", "этот", "тот", "кто", "что", "себя", "весь",
];
const RUSSIAN_PARTICLES: &[&str] = &[
    "не", "ни", "же", "ли", "бы", "вот", "вон", "только", "даже", "уже", "ведь", "разве", "лишь",
];
const RUSSIAN_INTERJECTIONS: &[&str] = &["ах", "ох", "эх", "ой", "увы", "ура", "эй"];
const RUSSIAN_INTRODUCTORY: &[&str] = &[
    "конечно", "кажется", "наверное", "впрочем", "итак", "пожалуй", "вероятно",
];

const ENGLISH_CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "if", "unless",
    "while", "whereas", "whether",
];
const ENGLISH_PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "to", "from", "up", "down", "of", "off",
    "over", "under", "near", "without", "within", "upon",
];
const ENGLISH_PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "this", "these", "those", "who", "whom", "which", "what",
    "myself", "yourself", "itself", "themselves",
];
const ENGLISH_PARTICLES: &[&str] = &["not", "no"];
const ENGLISH_INTERJECTIONS: &[&str] = &["oh", "ah", "wow", "hey", "oops", "alas", "hello"];

/// Tag given to content words
const RUSSIAN_CONTENT_TAG: &str = "С";
const ENGLISH_CONTENT_TAG: &str = "NOUN";

/// Rule-based morphology for one language
pub struct WordListMorphology {
    language: Language,
    function_words: HashMap<&'static str, &'static str>,
}

impl WordListMorphology {
    /// Creates the Russian analyser
    pub fn russian() -> Self {
        let classes: [(&[&'static str], &'static str); 6] = [
            (RUSSIAN_CONJUNCTIONS, "СОЮЗ"),
            (RUSSIAN_PREPOSITIONS, "ПРЕДЛ"),
            (RUSSIAN_PRONOUNS, "МС"),
            (RUSSIAN_PARTICLES, "ЧАСТ"),
            (RUSSIAN_INTERJECTIONS, "МЕЖД"),
            (RUSSIAN_INTRODUCTORY, "ВВОДН"),
        ];
        Self::from_classes(Language::Russian, &classes)
    }

    /// Creates the English analyser
    pub fn english() -> Self {
        let classes: [(&[&'static str], &'static str); 5] = [
            (ENGLISH_CONJUNCTIONS, "CONJ"),
            (ENGLISH_PREPOSITIONS, "PREP"),
            (ENGLISH_PRONOUNS, "PN"),
            (ENGLISH_PARTICLES, "PART"),
            (ENGLISH_INTERJECTIONS, "INT"),
        ];
        Self::from_classes(Language::English, &classes)
    }

    fn from_classes(language: Language, classes: &[(&[&'static str], &'static str)]) -> Self {
        let mut function_words = HashMap::new();
        for (words, tag) in classes {
            for word in *words {
                // First class wins for words listed twice ("что").
                function_words.entry(*word).or_insert(*tag);
            }
        }
        Self {
            language,
            function_words,
        }
    }

    fn check_charset(&self, word: &str) -> Result<(), MorphologyError> {
        if word.is_empty() || !word.chars().all(|c| self.language.is_letter(c)) {
            return Err(MorphologyError::UnsupportedCharset {
                word: word.to_string(),
                language: self.language,
            });
        }
        Ok(())
    }

    fn normalize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if self.function_words.contains_key(lower.as_str()) {
            return lower;
        }

        match self.language {
            Language::Russian => lower.replace('ё', "е"),
            Language::English => english_singular(&lower),
        }
    }
}

/// Folds regular English plural endings
fn english_singular(word: &str) -> String {
    let len = word.len();

    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..len - 3]);
    }
    if word.ends_with("sses") {
        return word[..len - 2].to_string();
    }
    if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..len - 1].to_string();
    }

    word.to_string()
}

impl Morphology for WordListMorphology {
    fn language(&self) -> Language {
        self.language
    }

    fn normal_forms(&self, word: &str) -> Result<Vec<String>, MorphologyError> {
        self.check_charset(word)?;
        Ok(vec![self.normalize(word)])
    }

    fn morph_info(&self, normal_form: &str) -> Result<String, MorphologyError> {
        self.check_charset(normal_form)?;

        let tag = match self.function_words.get(normal_form) {
            Some(tag) => *tag,
            None => match self.language {
                Language::Russian => RUSSIAN_CONTENT_TAG,
                Language::English => ENGLISH_CONTENT_TAG,
            },
        };

        Ok(format!("{}|{}", normal_form, tag))
    }
}
