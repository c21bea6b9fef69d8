//! Pure scoring function shared by `Term` and `Split`.

use crate::term::{DictionarySource, SourceSet};

/// Calculates the relative value of a term or split's text.
///
/// This is one of several scoring algorithms tried during development and
/// was kept after empirical tuning; the thresholds below depress the
/// influence of very common short bigrams unless the term was manually
/// whitelisted as supplemental vocabulary. Reproduce these rules bit for
/// bit — any deviation changes which segmentation wins.
pub fn word_value(text: &str, frequency: f64, multiplier: f64, sources: &SourceSet) -> f64 {
    let mut frequency = if frequency <= 0.0 { 1e-8 } else { frequency };

    let has_space = text.contains(' ');
    let len = text.len();
    let supplemental = sources.contains(&DictionarySource::Supplemental);

    if (len <= 3 || (has_space && len <= 4)) && frequency > 1e-3 && !supplemental {
        frequency = 1e-6;
    }
    if len <= 7 && frequency > 1e-3 && has_space && !supplemental {
        frequency = 1e-6;
    }
    if len <= 7 && has_space && !supplemental {
        frequency *= 1e-3;
    }

    let value = (frequency * 1e8).ln();
    value * multiplier * len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(codes: &[DictionarySource]) -> SourceSet {
        codes.iter().copied().collect()
    }

    #[test]
    fn non_positive_frequency_is_replaced() {
        let a = word_value("cat", 0.0, 1.0, &sources(&[]));
        let b = word_value("cat", 1e-8, 1.0, &sources(&[]));
        assert_eq!(a, b);
    }

    #[test]
    fn short_common_word_is_depressed_unless_supplemental() {
        let plain = word_value("the", 0.05, 1.0, &sources(&[]));
        let boosted = word_value("the", 0.05, 1.0, &sources(&[DictionarySource::Supplemental]));
        assert!(boosted > plain, "supplemental short terms should score higher than depressed ones");
    }

    #[test]
    fn short_bigram_is_depressed_more_than_short_unigram() {
        let unigram = word_value("cats", 0.05, 1.0, &sources(&[]));
        let bigram = word_value("the cat", 0.05, 1.0, &sources(&[]));
        // The bigram triggers all three depression rules; its resulting
        // frequency (1e-6 * 1e-3) is far smaller than the unigram's 1e-6.
        assert!(bigram < unigram);
    }

    #[test]
    fn is_deterministic() {
        let sources = sources(&[DictionarySource::GoogleBooks1Gram]);
        let a = word_value("reasonable", 0.0042, 1.5, &sources);
        let b = word_value("reasonable", 0.0042, 1.5, &sources);
        assert_eq!(a, b);
    }
}
