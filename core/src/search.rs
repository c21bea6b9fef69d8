//! Candidate-expansion search over a pool of `Pass`es (§4.5).

use ahash::AHashSet;

use crate::dictionary::Dictionary;
use crate::pass::Pass;
use crate::presegment::{preserve_a1, split_on_break_chars, split_on_numbers};
use crate::term::Term;

/// The result of one search run: the ranked, deduplicated passes and the
/// truncated candidate-term list that produced them (callers report
/// `term_count` from the latter).
pub struct SearchOutcome {
    pub passes: Vec<Pass>,
    pub candidate_terms: Vec<Term>,
}

fn is_plain_integer(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Runs the full search procedure against `input`: pre-segmentation, greedy
/// term substitution bounded by `max_terms`/`max_passes`, fallback matching
/// of leftover splits, scoring, and deduplication.
pub fn search(dictionary: &Dictionary, input: &str, max_terms: usize, max_passes: usize) -> SearchOutcome {
    let mut pool = vec![Pass::seed(input)];
    split_on_numbers(dictionary, &mut pool);
    preserve_a1(dictionary, &mut pool);
    split_on_break_chars(&mut pool);

    let mut candidate_terms = dictionary.find_matching_terms(input, 3);
    candidate_terms.sort_by(|a, b| b.value().partial_cmp(&a.value()).unwrap());
    candidate_terms.truncate(max_terms);

    let mut seen: AHashSet<String> = pool.iter_mut().map(|p| p.unique_string().to_string()).collect();

    'terms: for term in &candidate_terms {
        let mut pass_idx = 0;
        let mut truncated = false;
        while pass_idx < pool.len() {
            if pool.len() > max_passes {
                truncated = true;
                break;
            }
            if pool[pass_idx].is_done() {
                pass_idx += 1;
                continue;
            }
            let split_count = pool[pass_idx].splits().len();
            for j in 0..split_count {
                let (matched, text) = {
                    let s = &pool[pass_idx].splits()[j];
                    (s.matched(), s.text().to_string())
                };
                if matched {
                    continue;
                }
                if let Some(start) = text.find(term.compressed()) {
                    let mut clone = pool[pass_idx].clone();
                    clone.split(j, start, term.compressed().len(), term);
                    if seen.insert(clone.unique_string().to_string()) {
                        pool.push(clone);
                    }
                }
                if pool.len() > max_passes {
                    truncated = true;
                    break;
                }
            }
            pass_idx += 1;
            if truncated {
                break;
            }
        }

        if truncated {
            tracing::warn!(input, pool_size = pool.len(), max_passes, "search truncated pass pool before completion");
            break 'terms;
        }
        if pool.iter().all(Pass::is_done) {
            break 'terms;
        }
    }

    for pass in pool.iter_mut() {
        let mut changed = false;
        for split in pass.splits_mut() {
            if split.matched() {
                continue;
            }
            if let Some(term) = dictionary.find_term(split.text()) {
                split.match_term(&term);
                changed = true;
            } else if is_plain_integer(split.text()) {
                split.match_without_term();
                changed = true;
            }
        }
        if changed {
            pass.generate_stored_values();
        }
    }

    let mut scored: Vec<(f64, Pass)> = pool
        .into_iter()
        .map(|mut p| {
            let score = p.score();
            (score, p)
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut pool: Vec<Pass> = scored.into_iter().map(|(_, p)| p).collect();

    let mut seen_display: AHashSet<String> = AHashSet::new();
    pool.retain_mut(|p| seen_display.insert(p.display_text().to_string()));

    SearchOutcome { passes: pool, candidate_terms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dict_with(records: &str) -> Dictionary {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{records}").unwrap();
        let dict = Dictionary::new();
        dict.load_data(f.path()).unwrap();
        dict
    }

    #[test]
    fn finds_full_segmentation_for_simple_concatenation() {
        let dict = dict_with("some\t0.02\t1.0\t1\nother\t0.01\t1.0\t1\nstuff\t0.015\t1.0\t1\n");
        let mut outcome = search(&dict, "someotherstuff", 25, 10_000);
        assert!(!outcome.passes.is_empty());
        let best = &mut outcome.passes[0];
        assert_eq!(best.display_text(), "some other stuff");
        assert!(best.is_done());
    }

    #[test]
    fn passes_are_sorted_descending_by_score() {
        let dict = dict_with("cat\t0.05\t1.0\t1\ndog\t0.05\t1.0\t1\n");
        let mut outcome = search(&dict, "catdog", 25, 10_000);
        let mut last_score = f64::INFINITY;
        for p in outcome.passes.iter_mut() {
            let s = p.score();
            assert!(s <= last_score);
            last_score = s;
        }
    }

    #[test]
    fn passes_are_deduplicated_by_display_text() {
        let dict = dict_with("a\t0.05\t1.0\t1\nb\t0.05\t1.0\t1\n");
        let mut outcome = search(&dict, "ab", 25, 10_000);
        let mut seen = AHashSet::new();
        for p in outcome.passes.iter_mut() {
            assert!(seen.insert(p.display_text().to_string()));
        }
    }

    #[test]
    fn unmatched_integer_split_falls_back_to_match_without_term() {
        let dict = dict_with("house\t0.02\t1.0\t1\n");
        let mut outcome = search(&dict, "286192house", 25, 10_000);
        let best = &mut outcome.passes[0];
        assert!(best.is_done());
    }

    #[test]
    fn coverage_invariant_holds_for_every_returned_pass() {
        let dict = dict_with("some\t0.02\t1.0\t1\nother\t0.01\t1.0\t1\nstuff\t0.015\t1.0\t1\n");
        let outcome = search(&dict, "someotherstuff", 25, 10_000);
        for p in &outcome.passes {
            let concatenated: String = p.splits().iter().map(|s| s.text()).collect();
            assert_eq!(concatenated, "someotherstuff");
        }
    }

    #[test]
    fn single_unmatched_character_is_its_own_output() {
        let dict = dict_with("cat\t0.05\t1.0\t1\n");
        let mut outcome = search(&dict, "x", 25, 10_000);
        assert_eq!(outcome.passes[0].display_text(), "x");
    }
}
