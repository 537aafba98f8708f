use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use lobby_scraper::config::Config;
use lobby_scraper::constants;
use lobby_scraper::email;
use lobby_scraper::error::Result;
use lobby_scraper::logging;
use lobby_scraper::persistence;
use lobby_scraper::pipeline::{Pipeline, ProviderOutcome};
use lobby_scraper::providers::{create_scraper, LobbyScraper};

#[derive(Parser)]
#[command(name = "lobby_scraper")]
#[command(about = "Third-party live-casino lobby table checker")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape provider lobbies, diff against the baseline and write reports
    Check {
        /// Specific providers to run (comma-separated). Default: all supported
        #[arg(long)]
        providers: Option<String>,
        /// Skip emailing the Excel report directory afterwards
        #[arg(long)]
        no_email: bool,
    },
    /// Convert a downloaded baseline workbook into per-provider expected JSON
    Baseline {
        /// Path to the baseline .xlsx workbook
        #[arg(long)]
        excel: PathBuf,
    },
    /// Email an already-written report directory
    Send,
}

fn resolve_scrapers(providers: Option<String>) -> Result<Vec<Box<dyn LobbyScraper>>> {
    let names: Vec<String> = match providers {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => constants::supported_providers()
            .into_iter()
            .map(String::from)
            .collect(),
    };
    names.iter().map(|name| create_scraper(name)).collect()
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { providers, no_email } => {
            println!("🔄 Running lobby checks...");
            let config = Config::load()?;
            let scrapers = resolve_scrapers(providers)?;

            let outcomes = Pipeline::run_batch(scrapers, &config, !no_email).await;

            println!("\n📊 Batch results:");
            let mut failures = 0;
            for (provider, outcome) in &outcomes {
                match outcome {
                    ProviderOutcome::Completed(result) => {
                        println!(
                            "   ✅ {}: {} categories scraped, {} added, {} removed",
                            provider,
                            result.actual_categories,
                            result.added_tables,
                            result.removed_tables
                        );
                        for artifact in &result.artifacts {
                            println!("      - {}", artifact.display());
                        }
                    }
                    ProviderOutcome::Skipped(_) => {
                        println!("   ⏭️  {}: coming soon, skipped", provider);
                    }
                    ProviderOutcome::Failed(e) => {
                        failures += 1;
                        println!("   ❌ {}: {}", provider, e);
                    }
                }
            }
            if failures > 0 {
                println!("\n⚠️  {failures} provider(s) failed; see logs for details");
            }
        }
        Commands::Baseline { excel } => {
            println!("📥 Converting baseline workbook {}...", excel.display());
            let config = Config::load()?;
            match persistence::baseline_from_workbook(&excel, &config.directories.expected_json) {
                Ok(written) => {
                    println!("✅ Wrote {} expected inventories", written.len());
                    for path in written {
                        println!("   - {}", path.display());
                    }
                }
                Err(e) => {
                    error!("Baseline conversion failed: {}", e);
                    println!("❌ Baseline conversion failed: {e}");
                }
            }
        }
        Commands::Send => {
            let config = Config::load()?;
            println!(
                "📧 Emailing reports from {}...",
                config.directories.report_excel.display()
            );
            match email::send_report(&config.email, &config.directories.report_excel) {
                Ok(()) => println!("✅ Report email sent"),
                Err(e) => {
                    error!("Report email failed: {}", e);
                    println!("❌ Report email failed: {e}");
                }
            }
        }
    }
    Ok(())
}
