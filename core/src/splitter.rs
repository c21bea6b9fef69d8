//! `simple_split`/`full_split` entry points (§4.6): the public façade that
//! orchestrates normalization, cache lookup, search, and result assembly.

use std::time::Instant;

use serde::Serialize;

use crate::cache::ResultCache;
use crate::dictionary::Dictionary;
use crate::error::SplitError;
use crate::pass::Pass;
use crate::search::search;
use crate::term::Term;

/// The outcome of a split operation, returned to the caller (§3).
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    pub input: String,
    pub output: String,
    pub score: f64,
    pub term_count: usize,
    /// The sorted, truncated candidate terms the search considered (the
    /// same list `term_count` counts), not a count of matched splits in the
    /// winning pass.
    pub matched_terms: Vec<Term>,
    pub pass_count: usize,
    pub passes: Vec<Pass>,
    pub elapsed_ms: f64,
    pub from_cache: bool,
}

/// Owns a `Dictionary` and its `ResultCache`, exposing the two public
/// segmentation entry points.
pub struct Splitter {
    dictionary: Dictionary,
    cache: ResultCache<SplitResult>,
    max_input_chars: usize,
}

impl Splitter {
    pub fn new(dictionary: Dictionary, max_cache_items: usize, cleanup_secs: u64, max_input_chars: usize) -> Self {
        Self {
            dictionary,
            cache: ResultCache::new(max_cache_items, cleanup_secs),
            max_input_chars,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Trims leading/trailing ASCII whitespace, lower-cases ASCII letters,
    /// and truncates silently to `max_input_chars` (§6/§7). Non-ASCII
    /// characters pass through unchanged.
    fn normalize(&self, input: &str) -> String {
        input
            .trim()
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .take(self.max_input_chars)
            .collect()
    }

    /// Looks up a cached result first when `use_cache`; otherwise runs
    /// `full_split` with `pass_display = 1`.
    pub fn simple_split(&self, input: &str, use_cache: bool, max_terms: usize, max_passes: usize) -> Result<SplitResult, SplitError> {
        let normalized = self.normalize(input);
        if use_cache {
            if let Some(mut cached) = self.cache.get(&normalized) {
                cached.from_cache = true;
                return Ok(cached);
            }
        }
        self.run(normalized, use_cache, 1, max_terms, max_passes)
    }

    /// Runs the full search, keeping only the top `pass_display` passes in
    /// the result while reporting the true pre-truncation `pass_count`.
    /// Unlike `simple_split`, this never reads the cache first: a caller
    /// asking for a specific `pass_display` depth always gets a fresh
    /// search at that depth, even if an earlier call cached a result for
    /// the same input truncated to a different depth.
    pub fn full_split(
        &self,
        input: &str,
        use_cache: bool,
        pass_display: usize,
        max_terms: usize,
        max_passes: usize,
    ) -> Result<SplitResult, SplitError> {
        let normalized = self.normalize(input);
        self.run(normalized, use_cache, pass_display.max(1), max_terms, max_passes)
    }

    fn run(
        &self,
        normalized: String,
        use_cache: bool,
        pass_display: usize,
        max_terms: usize,
        max_passes: usize,
    ) -> Result<SplitResult, SplitError> {
        let started = Instant::now();
        let outcome = search(&self.dictionary, &normalized, max_terms, max_passes);
        let pass_count = outcome.passes.len();
        let matched_terms = outcome.candidate_terms;
        let term_count = matched_terms.len();
        let mut passes = outcome.passes;

        let (output, score) = match passes.first_mut() {
            Some(best) => (best.display_text().to_string(), best.score()),
            None => (normalized.clone(), 0.0),
        };
        passes.truncate(pass_display);

        let result = SplitResult {
            input: normalized.clone(),
            output,
            score,
            term_count,
            matched_terms,
            pass_count,
            passes,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
            from_cache: false,
        };

        if use_cache {
            self.cache.set(normalized, result.clone());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn splitter_with(records: &str) -> Splitter {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{records}").unwrap();
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        Splitter::new(dict, 1000, 60, 100)
    }

    #[test]
    fn simple_split_lowercases_and_trims_before_search() {
        let s = splitter_with("cat\t0.05\t1.0\t1\n");
        let result = s.simple_split("  CAT  ", false, 25, 10_000).unwrap();
        assert_eq!(result.input, "cat");
        assert_eq!(result.output, "cat");
    }

    #[test]
    fn full_split_reports_true_pass_count_despite_truncation() {
        let s = splitter_with("cat\t0.05\t1.0\t1\ndog\t0.05\t1.0\t1\n");
        let result = s.full_split("catdog", false, 1, 25, 10_000).unwrap();
        assert_eq!(result.passes.len(), 1);
        assert!(result.pass_count >= 1);
    }

    #[test]
    fn cached_result_is_flagged_on_second_call() {
        let s = splitter_with("cat\t0.05\t1.0\t1\n");
        let first = s.simple_split("cat", true, 25, 10_000).unwrap();
        assert!(!first.from_cache);
        let second = s.simple_split("cat", true, 25, 10_000).unwrap();
        assert!(second.from_cache);
        assert_eq!(second.output, first.output);
    }

    #[test]
    fn oversized_input_is_truncated_silently() {
        let s = splitter_with("cat\t0.05\t1.0\t1\n");
        let long_input = "a".repeat(500);
        let result = s.simple_split(&long_input, false, 25, 10_000).unwrap();
        assert_eq!(result.input.len(), 100);
    }
}
