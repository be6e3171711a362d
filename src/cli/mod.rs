//! Command-line interface for repo-ask
//!
//! Every subcommand clones the repository into a temporary workspace, works
//! on it, and removes it before exiting.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::load_config;

mod ask;
mod context;
mod deps;
mod info;
mod summarize;
mod utils;

/// Ask questions about remote Git repositories
#[derive(Parser)]
#[command(name = "repo-ask")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML or YAML) [default: repo-ask.toml in the working directory]
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the context bundle assembled from a repository
    Context(context::ContextArgs),

    /// Summarize a repository and show its structure
    Info(info::InfoArgs),

    /// Answer a question about a repository
    Ask(ask::AskArgs),

    /// Summarize a single file
    Summarize(summarize::SummarizeArgs),

    /// Detect and explain dependencies
    Deps(deps::DepsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::Context(args) => context::run(args, &config),
        Commands::Info(args) => info::run(args, &config),
        Commands::Ask(args) => ask::run(args, &config),
        Commands::Summarize(args) => summarize::run(args, &config),
        Commands::Deps(args) => deps::run(args, &config),
    }
}
