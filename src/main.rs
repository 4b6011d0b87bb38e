use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::error;

use gridiron_scraper::config::Config;
use gridiron_scraper::constants::INJURY_SOURCE;
use gridiron_scraper::fetch::{Pacer, TokioPacer};
use gridiron_scraper::pipeline::{persist_run_result, BatchOrchestrator};
use gridiron_scraper::rankings::RankingsClient;
use gridiron_scraper::resolver::HistoryResolver;
use gridiron_scraper::sources::{create_source, supported_sources};
use gridiron_scraper::types::Position;
use gridiron_scraper::logging;

#[derive(Parser)]
#[command(name = "gridiron_scraper")]
#[command(about = "NFL player injury and stat history scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the ranked player roster
    Rankings {
        /// Keep only the top N ranked players
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Resolve one player's season history and print it as JSON
    Resolve {
        /// Player display name, e.g. "Josh Allen"
        #[arg(long)]
        player: String,
        /// Expected position (QB, RB, WR, TE); improves candidate ordering
        #[arg(long)]
        position: Option<String>,
        /// Stat source to resolve against. Available: injury, gamelog
        #[arg(long, default_value = INJURY_SOURCE)]
        source: String,
    },
    /// Run the full batch pipeline over the ranked roster
    Run {
        /// Keep only the top N ranked players
        #[arg(long)]
        limit: Option<usize>,
        /// Stat source to resolve against. Available: injury, gamelog
        #[arg(long, default_value = INJURY_SOURCE)]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;
    let pacer: Arc<dyn Pacer> = Arc::new(TokioPacer);

    match cli.command {
        Commands::Rankings { limit } => {
            let client = RankingsClient::new(&config, pacer)?;
            let roster = client.fetch_roster(limit).await?;
            println!("📋 {} ranked players", roster.len());
            for player in &roster {
                println!("   {:>3}. {} ({}, {})", player.rank, player.name, player.position, player.team);
            }
        }
        Commands::Resolve { player, position, source } => {
            let Some(stat_source) = create_source(&source, &config, pacer)? else {
                println!("⚠️  Unknown source: {source} (available: {})", supported_sources().join(", "));
                return Ok(());
            };
            let position = position.map(|p| p.parse::<Position>()).transpose()?;
            let resolver = HistoryResolver::new(stat_source.as_ref());
            match resolver.resolve(&player, position).await? {
                Some(timeline) => println!("{}", serde_json::to_string_pretty(&timeline)?),
                None => println!("⚠️  No verifiable history for {player}"),
            }
        }
        Commands::Run { limit, source } => {
            println!("🚀 Running full pipeline (source: {source})...");
            let Some(stat_source) = create_source(&source, &config, pacer.clone())? else {
                println!("⚠️  Unknown source: {source} (available: {})", supported_sources().join(", "));
                return Ok(());
            };

            println!("\n📡 Step 1: Fetching ranked roster...");
            let client = RankingsClient::new(&config, pacer.clone())?;
            let roster = match client.fetch_roster(limit).await {
                Ok(roster) => roster,
                Err(e) => {
                    // rankings failures are fatal: no roster, no partial output
                    error!(error = %e, "roster fetch failed; aborting run");
                    return Err(e.into());
                }
            };
            println!("✅ {} players in roster", roster.len());

            println!("\n🔎 Step 2: Resolving player histories...");
            let orchestrator = BatchOrchestrator::new(stat_source, pacer, &config);
            let result = orchestrator.run(roster).await;

            let output_file = persist_run_result(&result, &config.output_path)?;

            println!("\n📊 Run results:");
            println!("   Resolved: {}", result.resolved);
            println!("   Failed: {}", result.failed);
            println!("   No match: {}", result.no_match);
            println!("   Output file: {output_file}");
        }
    }
    Ok(())
}
