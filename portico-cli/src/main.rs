//! Portico — inspect the projects an admin frontend can point at.
//!
//! # Usage
//!
//! ```text
//! portico projects [--config <path>] [--request-url <url>] [--timeout <secs>] [--json]
//! portico current  [--config <path>] [--request-url <url>] [--json]
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{current::CurrentArgs, projects::ProjectsArgs};
use portico_core::{config, PorticoConfig};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "portico",
    version,
    about = "Inspect the backend projects configured for the admin frontend",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch display metadata for every configured project.
    Projects(ProjectsArgs),

    /// Show which project a request URL selects, without fetching anything.
    Current(CurrentArgs),
}

// ---------------------------------------------------------------------------
// Shared arguments
// ---------------------------------------------------------------------------

/// Where the configuration comes from and which page URL is being opened.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Config file. Defaults to ~/.portico/config.yaml.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page URL whose `?project=` parameter requests a project.
    #[arg(long, value_name = "URL")]
    pub request_url: Option<String>,
}

impl SessionArgs {
    pub fn load_config(&self) -> Result<PorticoConfig> {
        match &self.config {
            Some(path) => config::load_from(path)
                .with_context(|| format!("failed to load config '{}'", path.display())),
            None => config::load().context("failed to load ~/.portico/config.yaml"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    portico_fetch::init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Projects(args) => args.run(),
        Commands::Current(args) => args.run(),
    }
}
