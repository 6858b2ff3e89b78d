//! Handwave CLI: command-line interface for the gesture controller.
//!
//! Usage:
//!   handwave run --frames <PATH>   Drive the desktop from a frame recording
//!   handwave check                 Check system capabilities
//!   handwave validate <PATH>       Validate a frame recording
//!   handwave config [--write]      Show or write the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use handwave_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "handwave",
    about = "Control the desktop with hand gestures",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/handwave/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller until stdin closes or Ctrl+C
    Run {
        /// Frame recording (JSONL) to replay as the sensor
        #[arg(short, long)]
        frames: PathBuf,

        /// Log actions to this file instead of injecting them
        #[arg(long)]
        dry_run: Option<PathBuf>,

        /// Deliver frames as fast as possible instead of in real time
        #[arg(long)]
        unpaced: bool,
    },

    /// Check system capabilities
    Check,

    /// Validate a frame recording
    Validate {
        /// Path to the JSONL frame file
        path: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file so it can be edited
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    handwave_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Run {
            frames,
            dry_run,
            unpaced,
        } => commands::run::run(config, frames, dry_run, unpaced).await,
        Commands::Check => commands::check::run(&config),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Config { write } => commands::config::run(&config, cli.config, write),
    }
}
