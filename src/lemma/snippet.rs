//! Snippet builder
//!
//! Produces a highlighted excerpt of a page for a set of query lemmas.
//! Every matching word is wrapped in `<b>` markers; the first match of each
//! lemma anchors a display window around it. Overlapping windows merge.

use super::finder::{strip_tags, LemmaFinder};
use super::ELLIPSIS;
use crate::morphology::is_word_char;
use std::collections::{BTreeMap, HashSet};

const OPEN_MARK: &str = "<b>";
const CLOSE_MARK: &str = "</b>";

/// Total characters of context shared between all windows
const CONTEXT_BUDGET: usize = 150;

/// Minimum context on each side of a match
const MIN_HALF_WIDTH: usize = 20;

/// Builds a highlighted snippet of `html` for `lemmas`
///
/// Returns an empty string when no word of the page matches.
pub fn build_snippet(finder: &LemmaFinder, html: &str, lemmas: &[String]) -> String {
    let text: Vec<char> = strip_tags(html).chars().collect();
    let wanted: HashSet<&str> = lemmas.iter().map(String::as_str).collect();

    let mut marked: Vec<char> = Vec::with_capacity(text.len());
    let mut anchors: BTreeMap<usize, usize> = BTreeMap::new();
    let mut anchored = HashSet::new();
    let mut word = String::new();

    // A trailing sentinel closes a word that ends the text.
    for c in text.iter().copied().map(Some).chain(std::iter::once(None)) {
        match c {
            Some(c) if is_word_char(c) => {
                word.push(c);
                marked.push(c);
                continue;
            }
            _ => {}
        }

        if !word.is_empty() {
            if let Some(lemma) = finder.normal_form(&word) {
                if wanted.contains(lemma.as_str()) {
                    let start = marked.len() - word.chars().count();
                    marked.truncate(start);
                    marked.extend(OPEN_MARK.chars());
                    marked.extend(word.chars());
                    marked.extend(CLOSE_MARK.chars());

                    if anchored.insert(lemma) {
                        anchors.insert(start, marked.len() - start);
                    }
                }
            }
            word.clear();
        }

        if let Some(c) = c {
            marked.push(c);
        }
    }

    if anchors.is_empty() {
        return String::new();
    }

    let half_width = (CONTEXT_BUDGET / anchors.len()).max(MIN_HALF_WIDTH);
    let mut spans: Vec<Span> = Vec::new();

    for (&position, &length) in &anchors {
        let match_end = position + length;
        let start = position.saturating_sub(half_width);
        let end = (match_end + half_width).min(marked.len());

        if let Some(last) = spans.last_mut() {
            // Fully inside the previous window's visible text.
            if match_end <= last.visible_end(&marked) {
                continue;
            }
            if start < last.end {
                last.match_end = match_end;
                last.end = end;
                continue;
            }
        }

        spans.push(Span {
            start,
            position,
            match_end,
            end,
        });
    }

    let mut snippet = String::new();
    for span in &spans {
        snippet.push_str(ELLIPSIS);
        snippet.push_str(&span.render(&marked));
    }
    snippet.push_str(ELLIPSIS);
    snippet
}

/// A display window around one or more merged matches
///
/// `position` is the first match's start and `match_end` the last match's
/// end; only the context outside them is trimmed.
struct Span {
    start: usize,
    position: usize,
    match_end: usize,
    end: usize,
}

impl Span {
    fn visible_end(&self, marked: &[char]) -> usize {
        trimmed_end(marked, self.match_end, self.end)
    }

    fn render(&self, marked: &[char]) -> String {
        let from = trimmed_start(marked, self.start, self.position);
        let to = trimmed_end(marked, self.match_end, self.end);
        marked[from..to].iter().collect::<String>().trim().to_string()
    }
}

/// Moves `start` forward past a partial word, staying before `position`
fn trimmed_start(marked: &[char], start: usize, position: usize) -> usize {
    if start == 0 {
        return 0;
    }
    match marked[start..position].iter().position(|c| c.is_whitespace()) {
        Some(offset) => start + offset,
        None => start,
    }
}

/// Moves `end` back before a partial word, staying after `match_end`
fn trimmed_end(marked: &[char], match_end: usize, end: usize) -> usize {
    if end >= marked.len() {
        return end;
    }
    match marked[match_end..end].iter().rposition(|c| c.is_whitespace()) {
        Some(offset) => match_end + offset,
        None => end,
    }
}
