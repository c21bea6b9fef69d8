//! Typed error hierarchy (§11). Replaces the exception-collector pattern of
//! the reference implementation with `Result` propagation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    /// Dictionary loading failed; the dictionary's readiness signal is
    /// never released, so concurrent readers block forever (§7).
    #[error("failed to load dictionary {path}: {reason}")]
    DictionaryLoad {
        path: PathBuf,
        /// 1-based line number, when the failure is localized to one record.
        line: Option<usize>,
        reason: String,
    },

    /// An unexpected internal failure during search. Distinct from "no
    /// segmentation found", which is not an error: an input with no
    /// dictionary matches still produces a valid (if low-scoring) result.
    #[error("search failed for {input:?}: {reason}")]
    Search { input: String, reason: String },

    /// A `SplitterConfig` document failed to load or parse.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl SplitError {
    pub(crate) fn dictionary_load(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DictionaryLoad {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}
