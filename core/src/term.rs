//! Dictionary terms and their source provenance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::scoring::word_value;

/// The dictionary a term's frequency data was sourced from.
///
/// A term can be tagged with more than one source when it appeared in
/// several corpora during dictionary construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DictionarySource {
    Unknown = 0,
    GoogleBooks1Gram = 1,
    GoogleBooks2Gram = 2,
    Manual3Gram = 3,
    Supplemental = 4,
    Location = 5,
    Names = 6,
    Scrabble = 7,
    Adult = 8,
}

impl DictionarySource {
    /// Parses the integer encoding used in the dictionary file format (§6).
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Unknown,
            1 => Self::GoogleBooks1Gram,
            2 => Self::GoogleBooks2Gram,
            3 => Self::Manual3Gram,
            4 => Self::Supplemental,
            5 => Self::Location,
            6 => Self::Names,
            7 => Self::Scrabble,
            8 => Self::Adult,
            _ => return None,
        })
    }
}

/// A set of dictionary sources a term was found in. Ordered to keep
/// `Term` comparisons and serialization deterministic.
pub type SourceSet = BTreeSet<DictionarySource>;

/// An immutable dictionary entry.
///
/// Usually a single word, sometimes a short n-gram ("the end") stored with
/// spaces preserved in `full` but removed in `compressed`, which is the key
/// used for substring search against unspaced input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    full: String,
    compressed: String,
    words: Vec<String>,
    frequency: f64,
    multiplier: f64,
    sources: SourceSet,
}

impl Term {
    /// Builds a term, deriving `compressed` and `words` from `full`.
    ///
    /// `frequency` must be positive; callers that load untrusted data should
    /// validate this before construction (see `Dictionary::load_data`).
    pub fn new(full: impl Into<String>, frequency: f64, multiplier: f64, sources: SourceSet) -> Self {
        let full = full.into();
        let compressed = full.replace(' ', "");
        let words = full.split(' ').map(str::to_string).collect();
        Self {
            full,
            compressed,
            words,
            frequency,
            multiplier,
            sources,
        }
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn compressed(&self) -> &str {
        &self.compressed
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    /// Length of `compressed`, in bytes.
    pub fn char_count(&self) -> usize {
        self.compressed.len()
    }

    /// Number of words `full` splits into.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The scored value of this term, per the §4.1 scoring rules.
    pub fn value(&self) -> f64 {
        word_value(&self.full, self.frequency, self.multiplier, &self.sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(codes: &[u8]) -> SourceSet {
        codes.iter().map(|c| DictionarySource::from_code(*c).unwrap()).collect()
    }

    #[test]
    fn derives_compressed_and_words_for_unigram() {
        let t = Term::new("hello", 0.01, 1.0, sources(&[1]));
        assert_eq!(t.full(), "hello");
        assert_eq!(t.compressed(), "hello");
        assert_eq!(t.words(), &["hello".to_string()]);
        assert_eq!(t.word_count(), 1);
        assert_eq!(t.char_count(), 5);
    }

    #[test]
    fn derives_compressed_and_words_for_bigram() {
        let t = Term::new("the end", 0.001, 1.0, sources(&[2]));
        assert_eq!(t.compressed(), "theend");
        assert_eq!(t.words(), &["the".to_string(), "end".to_string()]);
        assert_eq!(t.word_count(), 2);
        assert_eq!(t.char_count(), 6);
    }

    #[test]
    fn from_code_rejects_out_of_range() {
        assert_eq!(DictionarySource::from_code(9), None);
        assert_eq!(DictionarySource::from_code(8), Some(DictionarySource::Adult));
    }
}
