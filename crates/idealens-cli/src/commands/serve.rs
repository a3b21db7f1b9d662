//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;

use idealens_core::gemini::GeminiClient;
use idealens_web::state::AppState;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, default_value = "5000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let client = Arc::new(GeminiClient::from_env().map_err(|_| {
        anyhow::anyhow!(
            "GEMINI_API_KEY environment variable not set.\n\
             Set it with: export GEMINI_API_KEY=your-key"
        )
    })?);

    println!();
    println!("  {} {}", "IdeaLens".cyan().bold(), "Web Server".bold());
    println!();
    println!(
        "  {}     http://{}:{}/api/analyze",
        "API".green(),
        args.host,
        args.port
    );
    println!(
        "  {}  http://{}:{}/health",
        "Health".green(),
        args.host,
        args.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    idealens_web::run_server(AppState::new(client), &args.host, args.port).await
}
