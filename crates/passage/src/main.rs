//! # Passage CLI (`psg`)
//!
//! The `psg` binary drives the indexing and retrieval pipelines from a
//! TOML configuration file.
//!
//! ## Usage
//!
//! ```bash
//! psg --config ./passage.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `psg init` | Write a commented starter configuration |
//! | `psg index` | Scan, chunk, embed, and snapshot the source corpus |
//! | `psg search "<query>"` | Return ranked passages for a query |
//! | `psg stats` | Show an index and configuration summary |
//! | `psg clear` | Delete the index snapshot |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use passage::{config, ingest, search, stats};

/// Passage — a local semantic passage retrieval engine.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Run `psg init` to write a commented starter config.
#[derive(Parser)]
#[command(
    name = "psg",
    about = "Passage — a local semantic passage retrieval engine",
    version,
    long_about = "Passage chunks a corpus of text documents into overlapping, token-bounded \
    passages, embeds them through a pluggable provider, and answers queries with exact \
    cosine-similarity search plus a formatted context block."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./passage.toml`. Index location, chunking budgets,
    /// retrieval defaults, and embedding provider settings are read from
    /// this file.
    #[arg(long, global = true, default_value = "./passage.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Write a commented starter configuration file.
    ///
    /// Creates the file at the `--config` path unless it already exists.
    /// Idempotent — running it twice is safe.
    Init,

    /// Build the index snapshot from the configured source.
    ///
    /// Scans the source root, chunks every document, embeds the chunks
    /// with the configured provider, and writes the snapshot. Each run
    /// rebuilds the snapshot from scratch.
    Index {
        /// Show document and chunk counts without embedding or writing.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of documents to index.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the indexed corpus.
    ///
    /// Embeds the query, runs an exact similarity search, and prints the
    /// ranked passages with scores and sources.
    Search {
        /// The search query string.
        query: String,

        /// Number of passages to return (defaults to `retrieval.top_k`).
        #[arg(long)]
        k: Option<usize>,

        /// Also print the assembled context block.
        #[arg(long)]
        context: bool,
    },

    /// Show an index and configuration summary.
    Stats,

    /// Delete the index snapshot artifacts.
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // init writes the config file, so it must not require one.
    if let Commands::Init = cli.command {
        return config::run_init(&cli.config);
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => unreachable!(),
        Commands::Index { dry_run, limit } => {
            ingest::run_index(&cfg, dry_run, limit)?;
        }
        Commands::Search { query, k, context } => {
            search::run_search(&cfg, &query, k, context)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Clear => {
            ingest::run_clear(&cfg)?;
        }
    }

    Ok(())
}
