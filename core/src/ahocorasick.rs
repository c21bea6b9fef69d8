//! Multi-pattern substring index over dictionary compressed-forms.
//!
//! Built on the `aho-corasick` crate rather than a hand-rolled automaton:
//! the crate already owns an arena of nodes with integer child/fail-link
//! indices, which is exactly the structure this component calls for.
//! This wrapper only adds the two-phase `add`/`finalize` lifecycle the rest
//! of the core depends on, buffering patterns until the automaton is built.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

/// Builder-then-reader over a fixed pattern set.
///
/// `add` may only be called before `finalize`; `find_all` may only be
/// called after.
#[derive(Debug, Default)]
pub struct AhoCorasickIndex {
    pending: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl AhoCorasickIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pattern` for matching. The pattern's own text is used as
    /// its associated value, per §4.2.
    ///
    /// # Panics
    /// Panics if called after `finalize`, or if `pattern` is empty.
    pub fn add(&mut self, pattern: &str) {
        assert!(self.automaton.is_none(), "AhoCorasickIndex::add called after finalize");
        assert!(!pattern.is_empty(), "AhoCorasickIndex patterns must be non-empty");
        self.pending.push(pattern.to_string());
    }

    /// Builds the automaton from every pattern added so far. Idempotent:
    /// calling it twice is a no-op the second time.
    pub fn finalize(&mut self) {
        if self.automaton.is_some() {
            return;
        }
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&self.pending)
            .expect("pattern set is well-formed (non-empty, validated by add)");
        self.automaton = Some(automaton);
    }

    /// Returns every pattern that occurs as a substring of `haystack`, in
    /// order of match-end position. Duplicates are possible and retained
    /// when a pattern occurs more than once or overlaps another match.
    ///
    /// # Panics
    /// Panics if called before `finalize`.
    pub fn find_all(&self, haystack: &str) -> Vec<&str> {
        let automaton = self
            .automaton
            .as_ref()
            .expect("AhoCorasickIndex::find_all called before finalize");
        automaton
            .find_overlapping_iter(haystack)
            .map(|m| self.pending[m.pattern().as_usize()].as_str())
            .collect()
    }
}
