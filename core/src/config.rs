//! On-disk configuration for the tunables in §6 (new, §12).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SplitError;

/// Deserializable cap set for a `Splitter`. The `Default` impl and
/// `exhaustive_profile` match the "default -> exhaustive" columns of the
/// input-size cap table (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub dictionary_path: PathBuf,
    pub max_input_chars: usize,
    pub max_terms: usize,
    pub max_passes: usize,
    pub max_cache_items: usize,
    pub cleanup_secs: u64,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            dictionary_path: PathBuf::from("dictionary.tsv"),
            max_input_chars: 100,
            max_terms: 25,
            max_passes: 10_000,
            max_cache_items: 100_000,
            cleanup_secs: 60,
        }
    }
}

impl SplitterConfig {
    /// The conservative preset: the "default" column of §6.
    pub fn default_profile() -> Self {
        Self::default()
    }

    /// The higher-recall preset: the "exhaustive" column of §6.
    pub fn exhaustive_profile() -> Self {
        Self {
            max_input_chars: 250,
            max_terms: 50,
            max_passes: 25_000,
            ..Self::default()
        }
    }

    /// Parses a config from a TOML document.
    pub fn from_toml_str(toml_text: &str) -> Result<Self, SplitError> {
        toml::from_str(toml_text).map_err(|e| SplitError::Config {
            reason: format!("invalid configuration TOML: {e}"),
        })
    }

    /// Loads a config from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SplitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SplitError::Config {
            reason: format!("reading {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes this config back to a TOML document, e.g. for a CLI
    /// `--dump-config` flag.
    pub fn to_toml_string(&self) -> Result<String, SplitError> {
        toml::to_string_pretty(self).map_err(|e| SplitError::Config {
            reason: format!("failed to serialize configuration: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_default_cap_column() {
        let cfg = SplitterConfig::default();
        assert_eq!(cfg.max_input_chars, 100);
        assert_eq!(cfg.max_terms, 25);
        assert_eq!(cfg.max_passes, 10_000);
    }

    #[test]
    fn exhaustive_profile_matches_the_exhaustive_cap_column() {
        let cfg = SplitterConfig::exhaustive_profile();
        assert_eq!(cfg.max_input_chars, 250);
        assert_eq!(cfg.max_terms, 50);
        assert_eq!(cfg.max_passes, 25_000);
        assert_eq!(cfg.max_cache_items, 100_000, "unset fields keep the default");
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = SplitterConfig::exhaustive_profile();
        let text = cfg.to_toml_string().unwrap();
        let parsed = SplitterConfig::from_toml_str(&text).unwrap();
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn partial_toml_document_fills_in_defaults() {
        let parsed = SplitterConfig::from_toml_str("max_terms = 5\n").unwrap();
        assert_eq!(parsed.max_terms, 5);
        assert_eq!(parsed.max_input_chars, SplitterConfig::default().max_input_chars);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(SplitterConfig::from_toml_str("not valid = [toml").is_err());
    }
}
