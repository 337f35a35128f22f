pub mod analyze;
pub mod embedders;
pub mod ingest;
pub mod search;
pub mod stats;

pub use analyze::handle_analyze;
pub use embedders::handle_embedders;
pub use ingest::handle_ingest;
pub use search::handle_search;
pub use stats::handle_stats;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use licita_config::{Config, ErrorFormatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "licita")]
#[command(about = "Check procurement requirements against a knowledge base of legal and technical documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest the knowledge base into the index
    Ingest {
        /// Directory to ingest (defaults to core.knowledge_base_dir)
        dir: Option<PathBuf>,

        /// Discard existing entries before ingesting
        #[arg(long)]
        full: bool,
    },
    /// Raw similarity search over the index
    Search {
        query: String,

        /// Number of results
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Analyze a JSON file of requirements
    Analyze {
        #[arg(long, value_name = "FILE")]
        requirements: PathBuf,

        /// Write the full analyses as JSON
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show index statistics
    Stats,
    /// Check which embedding backends are usable
    Embedders,
}

/// Explicit file when given, default locations otherwise. Config errors are
/// rendered through the colored formatter.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(p) => Config::from_file(p),
        None => Config::load(),
    };
    loaded.map_err(|e| anyhow!("{}", ErrorFormatter::new(e)))
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "licita",
            "--verbose",
            "analyze",
            "--requirements",
            "reqs.json",
            "--output",
            "out.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                requirements,
                output,
            } => {
                assert_eq!(requirements, PathBuf::from("reqs.json"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licita.toml");
        std::fs::write(&path, "[retrieval]\ntop_k = 3\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.retrieval.top_k, 3);

        std::fs::write(&path, "[retrieval]\ntop_k = 0\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
