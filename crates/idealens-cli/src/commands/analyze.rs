//! One-shot idea analysis command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use idealens_core::analysis::model::IdeaAnalysis;
use idealens_core::gemini::{GeminiClient, GeminiConfig};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// The project idea to analyze
    pub idea: String,

    /// Gemini model to use (overrides GEMINI_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let idea = args.idea.trim();
    if idea.is_empty() {
        anyhow::bail!("Please enter a project idea.");
    }

    let mut config = GeminiConfig::from_env().map_err(|_| {
        anyhow::anyhow!(
            "GEMINI_API_KEY environment variable not set.\n\
             Set it with: export GEMINI_API_KEY=your-key"
        )
    })?;
    if let Some(model) = args.model {
        config.model = model;
    }
    let client = GeminiClient::new(config);

    println!("{} Analyzing idea with {}", "→".dimmed(), client.model());
    let analysis = idealens_core::analysis::analyze_idea(&client, idea).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    print_analysis(&analysis);
    Ok(())
}

/// Print a readable summary of the analysis.
fn print_analysis(analysis: &IdeaAnalysis) {
    println!();
    println!("  {} {}", "•".dimmed(), "Summary".bold());
    println!("    {}", analysis.summary);
    println!("  {} {}", "•".dimmed(), "Market competition".bold());
    println!("    {}", analysis.market_competition);
    println!("  {} {}", "•".dimmed(), "Monetization potential".bold());
    println!("    {}", analysis.monetization_potential);
    println!("  {} {}", "•".dimmed(), "Target users".bold());
    println!("    {}", analysis.target_users);

    if !analysis.feature_suggestions.is_empty() {
        println!("  {} {}", "•".dimmed(), "Feature suggestions".bold());
        for item in &analysis.feature_suggestions {
            println!("    - {}", item);
        }
    }
    if !analysis.mvp_plan.is_empty() {
        println!("  {} {}", "•".dimmed(), "MVP plan".bold());
        for (i, step) in analysis.mvp_plan.iter().enumerate() {
            println!("    {}. {}", i + 1, step);
        }
    }

    println!(
        "  {} {}: {}",
        "•".dimmed(),
        "Risk score".bold(),
        analysis.risk_score
    );
    println!();
}
