//! Term storage, compressed-form index, and the Aho-Corasick automaton.

use ahash::AHashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Condvar, Mutex, OnceLock};

use crate::ahocorasick::AhoCorasickIndex;
use crate::error::SplitError;
use crate::term::{DictionarySource, SourceSet, Term};

fn has_numbers(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// One-shot readiness latch, mirroring the reference implementation's
/// `threading.Event`: readers block in `wait` until the loader calls
/// `signal`, after which every future `wait` returns immediately.
#[derive(Debug, Default)]
struct Readiness {
    done: Mutex<bool>,
    cv: Condvar,
}

impl Readiness {
    fn wait(&self) {
        let mut done = self.done.lock().unwrap();
        while !*done {
            done = self.cv.wait(done).unwrap();
        }
    }

    fn signal(&self) {
        let mut done = self.done.lock().unwrap();
        *done = true;
        self.cv.notify_all();
    }
}

struct DictionaryData {
    terms: Vec<Term>,
    terms_by_compressed: AHashMap<String, Vec<Term>>,
    special_numbers: Vec<Term>,
    index: AhoCorasickIndex,
}

/// Loads and stores the terms dictionary, supplying the search engine and
/// pre-segmenters with data. Built once via `load_data`, then read-only and
/// lock-free for the process lifetime (§4.3, §5).
#[derive(Default)]
pub struct Dictionary {
    ready: Readiness,
    data: OnceLock<DictionaryData>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads dictionary terms from `path` (§6 file format) and builds the
    /// compressed-form index and Aho-Corasick automaton. Idempotent: a
    /// second call on an already-loaded dictionary is a no-op. On failure,
    /// the readiness signal is never released, so any concurrent reader
    /// blocks forever (§7) — callers should treat `Err` here as fatal for
    /// the process.
    pub fn load_data(&self, path: impl AsRef<Path>) -> Result<(), SplitError> {
        if self.data.get().is_some() {
            return Ok(());
        }
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading dictionary");

        let file = std::fs::File::open(path)
            .map_err(|e| SplitError::dictionary_load(path, None, e.to_string()))?;
        let reader = BufReader::new(file);

        let mut terms: Vec<Term> = Vec::new();
        let mut terms_by_compressed: AHashMap<String, Vec<Term>> = AHashMap::new();
        let mut special_numbers: Vec<Term> = Vec::new();
        let mut index = AhoCorasickIndex::new();
        let mut seen_compressed: AHashMap<String, ()> = AHashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line_no = line_no + 1;
            let line = line.map_err(|e| SplitError::dictionary_load(path, Some(line_no), e.to_string()))?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let term = parse_line(&line).map_err(|reason| SplitError::dictionary_load(path, Some(line_no), reason))?;
            if line_no % 1000 == 0 {
                tracing::debug!(line_no, "loading dictionary terms");
            }

            let sole_adult = term.sources().len() == 1 && term.sources().contains(&DictionarySource::Adult);
            if sole_adult {
                continue;
            }

            if !seen_compressed.contains_key(term.compressed()) {
                seen_compressed.insert(term.compressed().to_string(), ());
                index.add(term.compressed());
            }
            if term.sources().contains(&DictionarySource::Supplemental) && has_numbers(term.compressed()) {
                special_numbers.push(term.clone());
            }
            terms_by_compressed
                .entry(term.compressed().to_string())
                .or_default()
                .push(term.clone());
            terms.push(term);
        }

        index.finalize();
        tracing::info!(term_count = terms.len(), "dictionary loaded");

        let data = DictionaryData {
            terms,
            terms_by_compressed,
            special_numbers,
            index,
        };
        // Single-shot: `load_data` is only ever called once successfully in
        // practice (enforced by the early-return above); if two loaders
        // somehow race, the loser's data is simply dropped.
        let _ = self.data.set(data);
        self.ready.signal();
        Ok(())
    }

    fn data(&self) -> &DictionaryData {
        self.ready.wait();
        self.data.get().expect("readiness implies data is set")
    }

    /// Total number of terms in the dictionary.
    pub fn size(&self) -> usize {
        self.data().terms.len()
    }

    /// All terms, in load order.
    pub fn terms(&self) -> &[Term] {
        &self.data().terms
    }

    /// Special numbers: `Supplemental` terms whose compressed form contains
    /// a digit (e.g. `3d`, `80s`, `401k`), used by `split_on_numbers` to
    /// protect those substrings from being treated as plain digits.
    pub fn special_numbers(&self) -> &[Term] {
        &self.data().special_numbers
    }

    /// Every term whose compressed form occurs as a substring of `input`
    /// and whose `char_count >= min_chars`. Order is unspecified.
    pub fn find_matching_terms(&self, input: &str, min_chars: usize) -> Vec<Term> {
        let data = self.data();
        let mut out = Vec::new();
        for compressed in data.index.find_all(input) {
            if let Some(candidates) = data.terms_by_compressed.get(compressed) {
                for term in candidates {
                    if term.char_count() >= min_chars {
                        out.push(term.clone());
                    }
                }
            }
        }
        out
    }

    /// The term matching `compressed` exactly, preferring the entry with
    /// the greatest `word_count` when several terms share a compressed
    /// form (an intentional bias toward multi-word n-grams, §9).
    pub fn find_term(&self, compressed: &str) -> Option<Term> {
        let data = self.data();
        let candidates = data.terms_by_compressed.get(compressed)?;
        candidates.iter().max_by_key(|t| t.word_count()).cloned()
    }

    /// The highest-frequency single-word term matching `compressed`, or
    /// `None` if every term sharing that compressed form is a multi-word
    /// n-gram.
    pub fn find_single_word_term(&self, compressed: &str) -> Option<Term> {
        let data = self.data();
        let candidates = data.terms_by_compressed.get(compressed)?;
        candidates
            .iter()
            .filter(|t| t.word_count() == 1)
            .max_by(|a, b| a.frequency().partial_cmp(&b.frequency()).unwrap())
            .cloned()
    }
}

/// Parses one tab-separated dictionary record: `text \t frequency \t
/// multiplier \t sources`, where `sources` is a `|`-separated list of
/// `DictionarySource` integer codes.
fn parse_line(line: &str) -> Result<Term, String> {
    let mut fields = line.splitn(4, '\t');
    let text = fields.next().ok_or("missing text field")?;
    let frequency: f64 = fields
        .next()
        .ok_or("missing frequency field")?
        .parse()
        .map_err(|_| "frequency is not a valid float".to_string())?;
    let multiplier: f64 = fields
        .next()
        .ok_or("missing multiplier field")?
        .parse()
        .map_err(|_| "multiplier is not a valid float".to_string())?;
    let sources_field = fields.next().ok_or("missing sources field")?;

    let mut sources: SourceSet = SourceSet::new();
    for code in sources_field.split('|') {
        let code: u8 = code
            .trim()
            .parse()
            .map_err(|_| format!("invalid source code {code:?}"))?;
        let source = DictionarySource::from_code(code).ok_or_else(|| format!("unknown source code {code}"))?;
        sources.insert(source);
    }
    if sources.is_empty() {
        return Err("sources field must name at least one source".to_string());
    }
    if frequency <= 0.0 {
        return Err("frequency must be positive".to_string());
    }

    Ok(Term::new(text, frequency, multiplier, sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn loads_terms_and_skips_comments() {
        let f = fixture("# comment\nthe\t0.05\t1.0\t1\nend\t0.01\t1.0\t1\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        assert_eq!(dict.size(), 2);
    }

    #[test]
    fn drops_sole_adult_sourced_terms() {
        let f = fixture("dirty\t0.01\t1.0\t8\nclean\t0.01\t1.0\t1\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        assert_eq!(dict.size(), 1);
        assert!(dict.find_term("clean").is_some());
        assert!(dict.find_term("dirty").is_none());
    }

    #[test]
    fn keeps_adult_tagged_terms_with_other_sources() {
        let f = fixture("both\t0.01\t1.0\t1|8\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        assert!(dict.find_term("both").is_some());
    }

    #[test]
    fn find_matching_terms_respects_min_chars() {
        let f = fixture("a\t0.01\t1.0\t1\ncat\t0.01\t1.0\t1\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        let matches = dict.find_matching_terms("cat", 2);
        assert!(matches.iter().any(|t| t.compressed() == "cat"));
        assert!(!matches.iter().any(|t| t.compressed() == "a"));
    }

    #[test]
    fn find_term_prefers_greatest_word_count() {
        let f = fixture("the\t0.05\t1.0\t1\nthe end\t0.0001\t1.0\t2\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        let found = dict.find_term("theend").unwrap();
        assert_eq!(found.word_count(), 1);
        // "the" alone compresses to "the", not "theend"; only "the end" maps
        // to "theend", so word_count 2 is the only candidate.
        assert_eq!(found.full(), "the end");
    }

    #[test]
    fn find_single_word_term_ignores_ngrams() {
        let f = fixture("cat\t0.01\t1.0\t1\ncat dog\t0.001\t1.0\t2\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        let found = dict.find_single_word_term("catdog");
        assert!(found.is_none(), "only an n-gram maps to 'catdog'");
        let found = dict.find_single_word_term("cat");
        assert_eq!(found.unwrap().word_count(), 1);
    }

    #[test]
    fn special_numbers_are_supplemental_with_digits() {
        let f = fixture("3d\t0.01\t1.0\t4\nplain\t0.01\t1.0\t1\n");
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        assert_eq!(dict.special_numbers().len(), 1);
        assert_eq!(dict.special_numbers()[0].compressed(), "3d");
    }

    #[test]
    fn malformed_line_is_a_load_error() {
        let f = fixture("bad line with no tabs\n");
        let dict = Dictionary::new();
        assert!(dict.load_data(f.path()).is_err());
    }

    #[test]
    fn unknown_source_code_is_a_load_error() {
        let f = fixture("term\t0.01\t1.0\t99\n");
        let dict = Dictionary::new();
        assert!(dict.load_data(f.path()).is_err());
    }
}
