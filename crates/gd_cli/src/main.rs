//! gd: table validation and seeded game runs for the drive engine

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use gd_core::engine::config::env::{config_from_env_or_default, load_config_file};
#[cfg(feature = "cli")]
use gd_core::sim::{run_game, simulate_batch, BaselineCaller, GameRecord};
#[cfg(feature = "cli")]
use gd_core::{EngineConfig, FlowEvent, GameFlow, GameState, Side, TableStore};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "gd")]
#[command(about = "2d20 football drive engine tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Load and cross-check a table directory
    Validate {
        /// Directory holding decks.json, timekeeping.json, penalties/ and matchups/
        #[arg(long)]
        tables: PathBuf,
    },

    /// Play one seeded game with baseline callers on both sides
    Play {
        #[arg(long, default_value_t = 1337)]
        seed: u32,

        /// Table directory; the built-in tables when omitted
        #[arg(long)]
        tables: Option<PathBuf>,

        /// Engine config (JSON or YAML); otherwise GD_ENGINE_CONFIG_PATH or defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset: realistic, arcade, degraded
        #[arg(long, conflicts_with = "config")]
        profile: Option<String>,

        /// Print the full game record as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Play many seeded games in parallel and print one summary line each
    Batch {
        #[arg(long, default_value_t = 100)]
        games: u32,

        #[arg(long, default_value_t = 0)]
        start_seed: u32,

        #[arg(long)]
        tables: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { tables } => {
            let store = load_tables(Some(&tables))?;
            println!("Tables OK: {}", tables.display());
            let decks: Vec<&str> = store.catalog().deck_names().collect();
            println!("   Decks:     {} ({})", decks.len(), decks.join(", "));
            println!("   Defenses:  {}", store.catalog().defenses.len());
            println!("   Matchups:  {}", store.matchup_count());
            let mut keys: Vec<String> = store.matchup_keys().map(ToString::to_string).collect();
            keys.sort();
            for key in keys {
                println!("     - {}", key);
            }
        }

        Commands::Play { seed, tables, config, profile, json } => {
            let store = load_tables(tables.as_deref())?;
            let config = match profile {
                Some(name) => EngineConfig::from_profile(&name)
                    .with_context(|| format!("unknown profile '{}'", name))?,
                None => load_config(config.as_deref())?,
            };
            let record = play(&store, config, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_game(&record);
            }
        }

        Commands::Batch { games, start_seed, tables, config } => {
            let store = load_tables(tables.as_deref())?;
            let config = load_config(config.as_deref())?;
            let seeds: Vec<u32> = (0..games).map(|i| start_seed.wrapping_add(i)).collect();
            for result in simulate_batch(&store, &config, &seeds) {
                let summary = result?;
                println!(
                    "seed {:>10}  {:>3}-{:<3}  {:>4} plays  {}",
                    summary.seed,
                    summary.score.player,
                    summary.score.ai,
                    summary.actions,
                    &summary.digest[..16]
                );
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_tables(dir: Option<&Path>) -> Result<TableStore> {
    let store = match dir {
        Some(dir) => TableStore::load_dir(dir)
            .with_context(|| format!("loading tables from {}", dir.display()))?,
        None => TableStore::embedded().context("loading built-in tables")?,
    };
    tracing::info!(matchups = store.matchup_count(), "tables loaded");
    Ok(store)
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => load_config_file(path),
        None => config_from_env_or_default(),
    };
    config.map_err(anyhow::Error::msg)
}

#[cfg(feature = "cli")]
fn play(store: &TableStore, config: EngineConfig, seed: u32) -> Result<GameRecord> {
    let kickoff = GameState::new_game(Side::Ai, &config.clock);
    let mut player = BaselineCaller::with_rules(seed ^ 0xA5A5, &config.rules);
    let mut ai = BaselineCaller::with_rules(seed ^ 0x5A5A, &config.rules);
    let mut flow = GameFlow::new(store, config, seed);
    let record = run_game(&mut flow, kickoff, &mut player, &mut ai)?;
    Ok(record)
}

#[cfg(feature = "cli")]
fn print_game(record: &GameRecord) {
    for event in &record.events {
        match event {
            FlowEvent::Log { line } => println!("{}", line),
            FlowEvent::Score(score) => println!(
                "   ** {} {:?} (+{})  {}-{}",
                score.side.name(),
                score.kind,
                score.points,
                score.score.player,
                score.score.ai
            ),
            FlowEvent::EndOfQuarter { quarter } => println!("--- end of Q{} ---", quarter),
            FlowEvent::Halftime => println!("--- halftime ---"),
            FlowEvent::Final { score } => {
                println!("=== final: player {} - ai {} ===", score.player, score.ai)
            }
            FlowEvent::ChoiceRequired { .. } | FlowEvent::Hud { .. } => {}
        }
    }
    println!("plays: {}  digest: {}", record.plays.len(), record.digest);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gd CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
