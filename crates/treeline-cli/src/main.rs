//! Treeline CLI
//!
//! Command-line interface for replaying git history into an in-memory repository.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "treeline")]
#[command(author, version, about = "Replay git history into memory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a repository and print a summary
    Import {
        /// Repository path (clone target when --url is given)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Clone this URL into PATH first
        #[arg(long)]
        url: Option<String>,

        /// JSON file with import options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Do not record author and message tags
        #[arg(long)]
        no_metadata: bool,

        /// Give up after this many seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the first-parent log of a reconstructed branch
    Log {
        /// Repository path
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Branch name (defaults to the checked out branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Maximum entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List the childless commits of the reconstructed repository
    Tips {
        /// Repository path
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("treeline=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("treeline=info")
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Import {
            path,
            url,
            config,
            no_metadata,
            timeout,
            json,
        } => {
            commands::import::run(path, url, config, no_metadata, timeout, json).await?;
        }
        Commands::Log {
            path,
            branch,
            limit,
        } => {
            commands::log::run(path, branch, limit).await?;
        }
        Commands::Tips { path } => {
            commands::tips::run(path).await?;
        }
    }

    Ok(())
}
