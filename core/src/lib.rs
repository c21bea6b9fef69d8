//! Dictionary-driven segmentation engine for unspaced character runs.
//!
//! Given a compressed identifier like `splitthistextintoseparatewords`, this
//! crate recovers the most likely sequence of dictionary terms by expanding
//! a pool of candidate segmentations (`Pass`es) against a term dictionary
//! backed by an Aho-Corasick automaton, then scoring and ranking the result.
//! Entry points live on [`Splitter`].

pub mod ahocorasick;
pub mod cache;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod pass;
pub mod presegment;
pub mod scoring;
pub mod search;
pub mod split;
pub mod splitter;
pub mod term;

pub use cache::{CacheStats, ResultCache};
pub use config::SplitterConfig;
pub use dictionary::Dictionary;
pub use error::SplitError;
pub use pass::Pass;
pub use split::Split;
pub use splitter::{SplitResult, Splitter};
pub use term::{DictionarySource, SourceSet, Term};
