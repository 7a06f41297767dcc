pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::normalizer::UndatedPolicy;

#[derive(Parser)]
#[command(name = "newsstand")]
#[command(about = "Read many feeds as one newest-first list", long_about = None)]
pub struct Cli {
    /// Feed list (CSV of `name,url` lines); defaults to ~/.config/newsstand/feeds.csv
    #[arg(short, long, global = true)]
    pub feeds: Option<PathBuf>,

    /// Number of feeds fetched concurrently
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// How to place entries without a publish date
    #[arg(long, value_enum, global = true)]
    pub undated: Option<UndatedPolicy>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Command-line flags win over config.toml.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.fetch.workers = workers;
        }
        if let Some(undated) = self.undated {
            config.feed.undated = undated;
        }
    }
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Fetch every feed and browse them (default)
    Tui,
    /// Fetch every feed and print the merged list
    List {
        /// Only show items matching this text
        #[arg(short, long)]
        query: Option<String>,

        /// Print at most this many items
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the configured feeds
    Sources,
}
