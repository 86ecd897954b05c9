//! bunpo - spaced repetition grammar tutor CLI.

mod review;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::Level as TraceLevel;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bunpo_core::{Level, TutorConfig};
use bunpo_store::{
    export_progress, import_progress, load_seed_file, starter_seeds, SqliteStore,
};

#[derive(Parser)]
#[command(name = "bunpo", version, about = "AI-assisted Japanese grammar tutor")]
struct Cli {
    /// Path to a config file (default: ~/.config/bunpo/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path override.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the database with grammar points.
    Seed {
        /// JSON seed files (each an array of grammar points). Without any,
        /// a small built-in starter set is used.
        files: Vec<PathBuf>,
    },
    /// Run an interactive review session.
    Review,
    /// Show database statistics.
    Stats,
    /// List grammar points.
    List {
        /// Restrict to one JLPT level (N5..N1).
        #[arg(long)]
        level: Option<Level>,
    },
    /// Export review progress to a JSON Lines file.
    Export { path: PathBuf },
    /// Import review progress from a JSON Lines file.
    Import { path: PathBuf },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(TraceLevel::WARN.into())
                .add_directive("bunpo=info".parse().unwrap()),
        )
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<TutorConfig> {
    let mut config = match &cli.config {
        Some(path) => TutorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => TutorConfig::load()?,
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Seed { files } => {
            let seeds = if files.is_empty() {
                starter_seeds()
            } else {
                let mut seeds = Vec::new();
                for path in &files {
                    seeds.extend(load_seed_file(path)?);
                }
                seeds
            };
            let store = SqliteStore::new(config.database_path())?;
            let added = store.seed_grammar_points(&seeds)?;
            println!(
                "Seeded {} grammar points ({} already present).",
                added,
                seeds.len() - added
            );
        }
        Commands::Review => review::run(config).await?,
        Commands::Stats => {
            let store = SqliteStore::new(config.database_path())?;
            let stats = store.stats(Utc::now())?;
            println!("Grammar points: {}", stats.total_points);
            println!("  never reviewed: {}", stats.new_points);
            println!("  in rotation:    {}", stats.active_points);
            println!("  due right now:  {}", stats.due_now);
            println!("Reviews logged: {}", stats.reviews_logged);
            if stats.reviews_logged > 0 {
                println!("Average streak:  {:.1}", stats.average_streak);
                println!("Average quality: {:.1}", stats.average_quality);
            }
        }
        Commands::List { level } => {
            let store = SqliteStore::new(config.database_path())?;
            let points = store.list_grammar(level)?;
            if points.is_empty() {
                println!("No grammar points found. Run `bunpo seed` first.");
            }
            for point in points {
                println!("[{}] {} - {}", point.level, point.concept, point.meaning);
            }
        }
        Commands::Export { path } => {
            let store = SqliteStore::new(config.database_path())?;
            let written = export_progress(&store, &path).await?;
            println!("Exported {} progress records to {}.", written, path.display());
        }
        Commands::Import { path } => {
            let store = SqliteStore::new(config.database_path())?;
            let summary = import_progress(&store, &path).await?;
            println!(
                "Imported {} of {} entries ({} unknown, {} malformed).",
                summary.applied, summary.total, summary.missing, summary.malformed
            );
        }
    }

    Ok(())
}
