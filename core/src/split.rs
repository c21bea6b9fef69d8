//! A single contiguous piece of the input within a `Pass`.

use serde::Serialize;

use crate::scoring::word_value;
use crate::term::{DictionarySource, SourceSet, Term};

const DEFAULT_FREQUENCY: f64 = 1e-8;
const DEFAULT_MULTIPLIER: f64 = 1.0;

/// A slice of the original input: either matched to a dictionary `Term`, or
/// still open and eligible for further subdivision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    text: String,
    frequency: f64,
    multiplier: f64,
    matched: bool,
    sources: SourceSet,
}

impl Split {
    /// Creates a new unmatched split covering `text`, with default weights.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            frequency: DEFAULT_FREQUENCY,
            multiplier: DEFAULT_MULTIPLIER,
            matched: false,
            sources: SourceSet::new(),
        }
    }

    /// Creates a split already matched to `term`, with `term.full()` as its
    /// display text. Used when a pre-segmenter or the search engine knows
    /// the term up front.
    pub fn from_term(term: &Term) -> Self {
        let mut split = Self::new(term.full());
        split.match_term(term);
        split
    }

    /// Creates a split already marked matched, with default weights and no
    /// sources. Used by pre-segmenters for numeric/joined segments that
    /// have no backing dictionary `Term` but are still known-good
    /// (e.g. a numeric segment like "286192" with no dictionary entry).
    /// Deliberately distinct from `match_without_term`, which tags the
    /// split `Unknown`; these segments are never tagged at all.
    pub fn new_matched(text: impl Into<String>) -> Self {
        let mut split = Self::new(text);
        split.matched = true;
        split
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// The scored value of this split's current text and weights.
    pub fn value(&self) -> f64 {
        word_value(&self.text, self.frequency, self.multiplier, &self.sources)
    }

    /// Marks this split matched, adopting `term`'s display text and weights.
    pub fn match_term(&mut self, term: &Term) {
        self.text = term.full().to_string();
        self.frequency = term.frequency();
        self.multiplier = term.multiplier();
        self.sources = term.sources().clone();
        self.matched = true;
    }

    /// Marks this split matched without an underlying `Term` (used for bare
    /// integers the dictionary has no entry for): default weights, tagged
    /// `Unknown`.
    pub fn match_without_term(&mut self) {
        self.frequency = DEFAULT_FREQUENCY;
        self.multiplier = DEFAULT_MULTIPLIER;
        self.sources.insert(DictionarySource::Unknown);
        self.matched = true;
    }
}
