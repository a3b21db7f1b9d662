//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod serve;

/// IdeaLens - Gemini-backed project idea analyzer
#[derive(Parser)]
#[command(name = "idealens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project idea
    Analyze(analyze::AnalyzeArgs),

    /// Start the web server
    Serve(serve::ServeArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::execute(args).await,
            Commands::Serve(args) => serve::execute(args).await,
        }
    }
}
