//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod data;
mod llm;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "lochguide")]
#[command(about = "Campsite, trail and attraction directory with AI-assisted planning")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the collection JSON files (overrides config file)
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: from config, else 127.0.0.1:3030)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Load the dataset and report collection sizes
    Check,

    /// List campsites near a trail or attraction
    Near {
        /// Anchor kind: trail or attraction
        kind: String,
        /// Slug of the trail or attraction
        slug: String,
        /// Search radius in kilometres
        #[arg(long, conflicts_with = "radius_miles")]
        radius_km: Option<f64>,
        /// Search radius in miles
        #[arg(long)]
        radius_miles: Option<f64>,
        /// Maximum number of campsites
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show completion service configuration and list available models
    Models,

    /// Answer a visitor question from the FAQ
    Faq {
        /// The question
        #[arg(required = true)]
        question: Vec<String>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data: cli.data,
    };
    let (settings, _config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Check => data::cmd_check(&settings).await,
        Commands::Near {
            kind,
            slug,
            radius_km,
            radius_miles,
            limit,
        } => data::cmd_near(&settings, &kind, &slug, radius_km, radius_miles, limit).await,
        Commands::Models => llm::cmd_llm_models(&settings).await,
        Commands::Faq { question, json } => {
            llm::cmd_faq(&settings, &question.join(" "), json).await
        }
    }
}
