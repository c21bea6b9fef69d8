//! Demo CLI for the segmentation core (§14). Not the HTTP front-end named
//! out of scope in §1: no routes, no request handling, just a developer/ops
//! convenience for exercising `simple_split`/`full_split` locally.
//!
//! Usage:
//!   wordsplit --dictionary data/dictionary.tsv splitthistextintoseparatewords
//!   wordsplit --dictionary data/dictionary.tsv --full --pass-display 5 < inputs.txt
//!   wordsplit --dump-config

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use wordsplit_core::{Dictionary, Splitter, SplitterConfig};

#[derive(clap::Parser, Debug)]
#[command(name = "wordsplit")]
#[command(about = "Segment an unspaced character run into dictionary words")]
struct Args {
    /// Inputs to segment. If omitted, reads one input per line from stdin.
    inputs: Vec<String>,

    /// Path to a TOML `SplitterConfig` document.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the dictionary path from `--config`.
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Uses the exhaustive cap profile instead of the default profile.
    #[arg(long)]
    exhaustive: bool,

    /// Runs `full_split` instead of `simple_split`, returning `pass-display`
    /// ranked candidates per input instead of just the best one.
    #[arg(long)]
    full: bool,

    /// Number of ranked passes to keep when `--full` is set.
    #[arg(long, default_value_t = 5)]
    pass_display: usize,

    /// Disables the result cache.
    #[arg(long)]
    no_cache: bool,

    /// Prints the resolved configuration as TOML and exits without loading
    /// a dictionary or segmenting anything.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SplitterConfig::from_toml_file(path).map_err(|e| anyhow::anyhow!(e.to_string()))?,
        None if args.exhaustive => SplitterConfig::exhaustive_profile(),
        None => SplitterConfig::default_profile(),
    };
    if let Some(dictionary_path) = &args.dictionary {
        config.dictionary_path = dictionary_path.clone();
    }

    if args.dump_config {
        println!("{}", config.to_toml_string().map_err(|e| anyhow::anyhow!(e.to_string()))?);
        return Ok(());
    }

    let dictionary = Dictionary::new();
    dictionary
        .load_data(&config.dictionary_path)
        .map_err(|e| anyhow::anyhow!("failed to load dictionary {}: {e}", config.dictionary_path.display()))?;

    let splitter = Splitter::new(dictionary, config.max_cache_items, config.cleanup_secs, config.max_input_chars);
    let use_cache = !args.no_cache;

    let inputs: Vec<String> = if args.inputs.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect()
    } else {
        args.inputs
    };

    for input in inputs {
        let result = if args.full {
            splitter.full_split(&input, use_cache, args.pass_display, config.max_terms, config.max_passes)
        } else {
            splitter.simple_split(&input, use_cache, config.max_terms, config.max_passes)
        }
        .map_err(|e| anyhow::anyhow!("split failed for {input:?}: {e}"))?;

        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
