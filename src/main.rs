mod catalog;
mod cli;
mod config;
mod digest;
mod logging;
mod mailer;
mod template;
mod tracker;
mod trend;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rising-stars")]
#[command(about = "Email a digest of the fastest-growing models in the Hugging Face top 500")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Metrics database path (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Additional config file, applied after the user and project files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress normal output
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the top models and send (or preview) the digest
    Run {
        /// Write the digest to a temp file instead of sending it
        #[arg(long)]
        preview: bool,

        /// Recipient address (overrides RECIPIENT_EMAIL)
        #[arg(long)]
        recipient: Option<String>,
    },

    /// Show metrics store statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the metrics store as CSV
    Export {
        /// Output file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::RisingStarsConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.storage.db_path = db.display().to_string();
    }

    logging::init_logging(cli.debug, cli.quiet, Some(&config.storage.log_dir()))?;

    let json = matches!(cli.command, Commands::Stats { json: true });
    let handler = cli::create_handler(cli::OutputMode::from_flags(json, cli.quiet), cli.debug);

    let result = match cli.command {
        Commands::Run { preview, recipient } => {
            let options = cli::RunOptions { preview, recipient };
            cli::run_digest(&config, &options, handler.as_ref()).await
        }
        Commands::Stats { .. } => cli::show_stats(&config, handler.as_ref()),
        Commands::Export { path } => cli::export_store(&config, &path, handler.as_ref()),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
    }

    result
}
