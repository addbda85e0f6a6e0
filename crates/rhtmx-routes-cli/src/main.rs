mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rhtmx-routes")]
#[command(version, about = "Inspect RHTMX resource routes declared in routes.toml", long_about = None)]
struct Cli {
    /// Route file to load
    #[arg(short, long, global = true, default_value = "routes.toml")]
    config: PathBuf,

    /// Log expansion details (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expanded route table
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Only show routes whose controller starts with this prefix
        #[arg(long)]
        controller: Option<String>,
    },

    /// Validate the route file without printing routes
    Check,

    /// Generate the URL of a named route
    Url {
        /// Route name (e.g., edit_post)
        name: String,

        /// Parameters as key=value
        params: Vec<String>,
    },

    /// List reverse-registration identifiers and the keys they need
    Resources,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);
    debug!(config = %cli.config.display(), "using route file");

    // Execute command
    match cli.command {
        Commands::Show { json, controller } => {
            commands::show::execute(&cli.config, json, controller.as_deref())?;
        }
        Commands::Check => {
            commands::check::execute(&cli.config)?;
        }
        Commands::Url { name, params } => {
            commands::url::execute(&cli.config, &name, &params)?;
        }
        Commands::Resources => {
            commands::show::resources(&cli.config)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins over the verbosity flag
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "rhtmx_resources=debug",
        _ => "rhtmx_resources=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
