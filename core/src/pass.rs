//! A candidate segmentation of the input: an ordered sequence of `Split`s.

use serde::Serialize;

use crate::split::Split;
use crate::term::Term;

/// One possible answer to a split operation. Dozens to thousands of passes
/// are generated per search; each is scored and the highest wins.
#[derive(Debug, Clone, Serialize)]
pub struct Pass {
    input: String,
    splits: Vec<Split>,
    #[serde(skip)]
    display_text: Option<String>,
    #[serde(skip)]
    unique_string: Option<String>,
    #[serde(skip)]
    score: Option<f64>,
}

impl Pass {
    /// Creates the initial pass for `input`: a single unmatched split
    /// covering the whole (already-normalized) string.
    pub fn seed(input: impl Into<String>) -> Self {
        let input = input.into();
        let splits = vec![Split::new(input.clone())];
        Self {
            input,
            splits,
            display_text: None,
            unique_string: None,
            score: None,
        }
    }

    /// Creates a pass from an explicit split list, e.g. the output of a
    /// pre-segmenter.
    pub fn from_splits(input: impl Into<String>, splits: Vec<Split>) -> Self {
        Self {
            input: input.into(),
            splits,
            display_text: None,
            unique_string: None,
            score: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn splits_mut(&mut self) -> &mut [Split] {
        &mut self.splits
    }

    /// All splits joined with a single space: the user-visible output.
    pub fn display_text(&mut self) -> &str {
        if self.display_text.is_none() {
            self.display_text = Some(self.generate_display_text());
        }
        self.display_text.as_deref().unwrap()
    }

    fn generate_display_text(&self) -> String {
        self.splits
            .iter()
            .map(Split::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A signature of the splits and their matched state, used to
    /// deduplicate passes during search.
    pub fn unique_string(&mut self) -> &str {
        if self.unique_string.is_none() {
            self.unique_string = Some(self.generate_unique_string());
        }
        self.unique_string.as_deref().unwrap()
    }

    fn generate_unique_string(&self) -> String {
        self.splits
            .iter()
            .map(|s| format!("{}:{}", s.text(), if s.matched() { 1 } else { 0 }))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// True once every split is matched; a done pass is never expanded
    /// further by the search engine.
    pub fn is_done(&self) -> bool {
        self.splits.iter().all(Split::matched)
    }

    fn average_word_value(&self) -> f64 {
        let total: f64 = self.splits.iter().map(Split::value).sum();
        total / self.splits.len() as f64
    }

    fn unmatched_split_count(&self) -> usize {
        self.splits.iter().filter(|s| !s.matched()).count()
    }

    /// Fraction (0..=1) of characters, across all splits, that belong to a
    /// matched split.
    fn match_ratio(&self) -> f64 {
        let total_chars: f64 = self.splits.iter().map(|s| s.text().len() as f64).sum();
        let matched_chars: f64 = self
            .splits
            .iter()
            .filter(|s| s.matched())
            .map(|s| s.text().len() as f64)
            .sum();
        matched_chars / total_chars
    }

    pub fn total_splits(&self) -> usize {
        self.splits.len()
    }

    /// The overall score for this pass, cached after first computation.
    /// Fully-matched passes get a flat 2x bonus over their average word
    /// value; partial passes are scaled down by their match ratio.
    pub fn score(&mut self) -> f64 {
        if let Some(score) = self.score {
            return score;
        }
        let value = self.average_word_value();
        let unmatched = self.unmatched_split_count();
        let score = if unmatched == 0 {
            value * 2.0
        } else {
            value * self.match_ratio()
        };
        self.score = Some(score);
        score
    }

    /// Splits `self.splits[split_index]` around the match of `term` found at
    /// byte offset `start` with byte length `length`. If the match spans the
    /// whole split, the split is marked matched in place; otherwise it is
    /// replaced by up to three splits (prefix, matched term, suffix) in
    /// input order. Invalidates cached derived fields.
    pub fn split(&mut self, split_index: usize, start: usize, length: usize, term: &Term) {
        let text_len = self.splits[split_index].text().len();
        if text_len == length {
            self.splits[split_index].match_term(term);
        } else {
            let source_text = self.splits[split_index].text().to_string();
            let mut replacement = Vec::with_capacity(3);
            if start == 0 {
                replacement.push(Split::from_term(term));
                replacement.push(Split::new(source_text[length..].to_string()));
            } else if start + length < text_len {
                replacement.push(Split::new(source_text[..start].to_string()));
                replacement.push(Split::from_term(term));
                replacement.push(Split::new(source_text[start + length..].to_string()));
            } else {
                replacement.push(Split::new(source_text[..start].to_string()));
                replacement.push(Split::from_term(term));
            }
            self.splits.splice(split_index..=split_index, replacement);
        }
        self.generate_stored_values();
    }

    /// Recomputes the cached display text / unique string. Must be called
    /// after any mutation of `splits` that doesn't go through `split`.
    pub fn generate_stored_values(&mut self) {
        self.display_text = Some(self.generate_display_text());
        self.unique_string = Some(self.generate_unique_string());
        self.score = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{DictionarySource, SourceSet};

    fn term(full: &str) -> Term {
        Term::new(full, 0.001, 1.0, SourceSet::from([DictionarySource::GoogleBooks1Gram]))
    }

    #[test]
    fn seed_pass_is_single_unmatched_split() {
        let mut p = Pass::seed("hello");
        assert_eq!(p.total_splits(), 1);
        assert!(!p.is_done());
        assert_eq!(p.display_text(), "hello");
    }

    #[test]
    fn split_whole_segment_marks_matched_in_place() {
        let mut p = Pass::seed("hello");
        p.split(0, 0, 5, &term("hello"));
        assert_eq!(p.total_splits(), 1);
        assert!(p.is_done());
        assert_eq!(p.display_text(), "hello");
    }

    #[test]
    fn split_prefix_and_suffix() {
        let mut p = Pass::seed("splitthis");
        p.split(0, 5, 4, &term("this"));
        assert_eq!(p.total_splits(), 2);
        assert_eq!(p.display_text(), "split this");
        assert!(!p.is_done());
    }

    #[test]
    fn split_middle_produces_prefix_match_suffix() {
        let mut p = Pass::seed("splitthistext");
        p.split(0, 5, 4, &term("this"));
        assert_eq!(p.display_text(), "split this text");
        assert_eq!(p.total_splits(), 3);
    }

    #[test]
    fn coverage_invariant_holds_after_splits() {
        let mut p = Pass::seed("splitthis");
        p.split(0, 5, 4, &term("this"));
        let concatenated: String = p.splits().iter().map(|s| s.text()).collect();
        assert_eq!(concatenated, "splitthis");
    }

    #[test]
    fn done_pass_scores_double_average() {
        let mut p = Pass::seed("x");
        p.split(0, 0, 1, &term("x"));
        let score = p.score();
        assert!(score.is_finite());
        assert!(p.is_done());
    }

    #[test]
    fn unique_string_reflects_match_state() {
        let mut a = Pass::seed("ab");
        let mut b = Pass::seed("ab");
        b.split(0, 0, 2, &term("ab"));
        assert_ne!(a.unique_string(), b.unique_string());
    }
}
