//! CLI for the reftrack referrer classifier.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reftrack_core::config::{self, ReftrackConfig};
use std::path::PathBuf;

use commands::{run_check, run_classify, run_enrich};

/// Top-level CLI for reftrack.
#[derive(Debug, Parser)]
#[command(name = "reftrack")]
#[command(about = "reftrack: classify page-view referrers by source and medium", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/reftrack/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify one referrer URL and print the attribution as JSON.
    Classify {
        /// Referrer URL (document.referrer).
        referrer: String,

        /// URL of the page that was visited (enables UTM and internal-referrer handling).
        #[arg(long, value_name = "URL")]
        page: Option<String>,
    },

    /// Build the referrer index and report table statistics.
    Check {
        /// Extra source table (.json or .toml) to merge over the configured ones.
        #[arg(long, value_name = "PATH")]
        sources: Option<PathBuf>,

        /// Treat duplicate (hostname, path) registrations as errors.
        #[arg(long)]
        strict: bool,
    },

    /// Enrich tag beacons (JSON lines) with attribution and print them as JSON lines.
    Enrich {
        /// Input file; reads stdin when omitted or "-".
        path: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { referrer, page } => {
                run_classify(&cfg, &referrer, page.as_deref())?
            }
            CliCommand::Check { sources, strict } => run_check(&cfg, sources, strict)?,
            CliCommand::Enrich { path } => run_enrich(&cfg, path.as_deref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ReftrackConfig> {
    match path {
        Some(path) => config::load_from_path(path),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
