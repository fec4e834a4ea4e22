//! Binary entry point for unitsplit.
//!
//! This binary provides the CLI interface for splitting a remittance file
//! into per-reference units files.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use unitsplit::config::UnitsplitConfig;
use unitsplit::observability;

use commands::{SplitArgs, cmd_config, cmd_split};

/// Unitsplit - splits a receivable-units remittance file into one file per reference.
#[derive(Parser)]
#[command(name = "unitsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Split the source table into units files.
    Split {
        /// Source table (default: config `input`).
        input: Option<PathBuf>,

        /// Destination directory (default: config `output_dir`).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Open the destination folder after a successful run.
        #[arg(long)]
        open: bool,

        /// Emit events as newline-delimited JSON instead of status lines.
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match UnitsplitConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(Some(&config.logging), cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Split {
            input,
            output_dir,
            open,
            json,
        } => {
            cmd_split(
                &config,
                SplitArgs {
                    input,
                    output_dir,
                    open,
                    json,
                },
            )
            .await
        },
        Commands::Config { show } => cmd_config(&config, show).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}
