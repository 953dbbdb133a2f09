use analytics::{AnalyticsEngine, LeagueHistory};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::Settings;
use database::{DbRepository, LeagueExport, connect, run_migrations};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// The main entry point for the Commish league dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = configuration::load_settings().context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&settings.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve => web_server::run_server(&settings).await,
        Commands::Migrate => {
            let db_pool = connect(&settings.database).await?;
            run_migrations(&db_pool).await?;
            println!("Migrations applied.");
            Ok(())
        }
        Commands::Import(args) => handle_import(args, &settings).await,
        Commands::Standings(args) => handle_standings(args, &settings).await,
        Commands::PowerRankings => handle_power_rankings(&settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Fantasy football league history, stats and narratives.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve,
    /// Apply database migrations and exit.
    Migrate,
    /// Load a league history JSON export into the database.
    Import(ImportArgs),
    /// Print a season's standings.
    Standings(StandingsArgs),
    /// Print the all-time power rankings.
    PowerRankings,
}

#[derive(Parser)]
struct ImportArgs {
    /// Path to the JSON export (members, leagues, seasons, teams, ...).
    #[arg(long)]
    file: PathBuf,
}

#[derive(Parser)]
struct StandingsArgs {
    /// The season to show (e.g., 2023).
    #[arg(long)]
    year: i32,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let db_pool = connect(&settings.database).await.context("Failed to connect to the database")?;
    run_migrations(&db_pool).await.context("Failed to run database migrations")?;
    Ok(DbRepository::new(db_pool))
}

async fn snapshot(settings: &Settings) -> anyhow::Result<(AnalyticsEngine, LeagueHistory)> {
    let engine = AnalyticsEngine::new(settings.analysis.power_weights)?;
    let db_repo = repository(settings).await?;
    let history = LeagueHistory::new(db_repo.load_history().await?);
    if history.is_empty() {
        anyhow::bail!("No league data found. Import a league export first.");
    }
    Ok((engine, history))
}

async fn handle_import(args: ImportArgs, settings: &Settings) -> anyhow::Result<()> {
    let export = LeagueExport::from_file(&args.file)?;
    println!("Importing {} rows from {}", export.total_rows(), args.file.display());

    let db_repo = repository(settings).await?;

    let progress_bar = ProgressBar::new(export.total_rows() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("upserting");

    let pb = progress_bar.clone();
    let summary = db_repo.import_export(&export, move || pb.inc(1)).await;
    match summary {
        Ok(summary) => {
            progress_bar.finish_with_message("Import complete!");
            println!(
                "leagues: {}, members: {}, seasons: {}, teams: {}, matchups: {}, draft picks: {}, transactions: {}",
                summary.leagues,
                summary.members,
                summary.seasons,
                summary.teams,
                summary.matchups,
                summary.draft_picks,
                summary.transactions
            );
            Ok(())
        }
        Err(e) => {
            progress_bar.abandon_with_message("Import rolled back");
            Err(e.into())
        }
    }
}

async fn handle_standings(args: StandingsArgs, settings: &Settings) -> anyhow::Result<()> {
    let (engine, history) = snapshot(settings).await?;
    let standings = engine.standings(&history, args.year)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Team", "Manager", "Record", "PF", "PA", "Playoffs", "Champion"]);
    for row in standings {
        table.add_row(vec![
            Cell::new(row.rank),
            Cell::new(&row.team_name),
            Cell::new(&row.manager),
            Cell::new(&row.record),
            Cell::new(row.points_for.round_dp(2)),
            Cell::new(row.points_against.round_dp(2)),
            Cell::new(if row.made_playoffs { "yes" } else { "" }),
            Cell::new(if row.is_champion { "🏆" } else { "" }),
        ]);
    }

    println!("Standings {}", args.year);
    println!("{table}");
    Ok(())
}

async fn handle_power_rankings(settings: &Settings) -> anyhow::Result<()> {
    let (engine, history) = snapshot(settings).await?;
    let rankings = engine.power_rankings(&history);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Member", "Score", "Seasons", "Titles", "Win %", "Playoff %", "PPG"]);
    for r in rankings {
        table.add_row(vec![
            Cell::new(r.rank),
            Cell::new(&r.member),
            Cell::new(r.power_score),
            Cell::new(r.seasons),
            Cell::new(r.championships),
            Cell::new(r.win_percentage),
            Cell::new(r.playoff_percentage),
            Cell::new(r.ppg),
        ]);
    }

    println!("{table}");
    Ok(())
}
