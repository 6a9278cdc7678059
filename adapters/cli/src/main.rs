#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the City Quiz in a terminal.

mod render;
mod script;
mod session;

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use city_quiz_core::{Event, DEFAULT_ROUND_SIZE};
use city_quiz_dataset::Catalog;
use city_quiz_system_round_selection::Config;
use clap::{Parser, Subcommand};
use log::{debug, warn};
use rand::Rng;

use crate::session::{Quiz, Step};

#[derive(Debug, Parser)]
#[command(name = "city-quiz")]
#[command(about = "Place city names on a regional map", long_about = None)]
struct Cli {
    /// Extra regions in TOML; entries replace built-in regions with the same code
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the playable regions
    Regions,

    /// Play rounds reading commands from standard input
    Play {
        /// Region code to start in
        #[arg(short, long, default_value = "ee")]
        region: String,

        /// Seed for target selection; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum number of cities per round
        #[arg(long, default_value_t = DEFAULT_ROUND_SIZE)]
        round_size: usize,
    },
}

/// Entry point for the City Quiz command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Regions => {
            for region in catalog.regions() {
                println!(
                    "{:<4} {:<20} {:>3} cities",
                    region.code(),
                    region.name(),
                    region.points().len()
                );
            }
            Ok(())
        }
        Commands::Play {
            region,
            seed,
            round_size,
        } => {
            let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
            debug!("playing with seed {seed}");
            play(catalog, &region, Config::new(round_size, seed))
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let builtin = Catalog::builtin().context("built-in regions are invalid")?;
    let Some(path) = path else {
        return Ok(builtin);
    };
    let extra = Catalog::from_path(path)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    Ok(builtin.merge(extra))
}

fn play(catalog: Catalog, region: &str, config: Config) -> Result<()> {
    let (mut quiz, events) = Quiz::start(catalog, region, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report(&mut out, &quiz, &events)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from standard input")?;
        let action = match script::parse_line(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };

        match quiz.handle(action) {
            Ok(Step::Continue(events)) => report(&mut out, &quiz, &events)?,
            Ok(Step::Redraw) => write!(out, "{}", render::board(quiz.world()))?,
            Ok(Step::Quit) => break,
            Err(error) => {
                warn!("{error:#}");
                writeln!(out, "{error:#}")?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

fn report(out: &mut impl Write, quiz: &Quiz, events: &[Event]) -> Result<()> {
    for line in events.iter().filter_map(render::event) {
        writeln!(out, "{line}")?;
    }

    let board_changed = events
        .iter()
        .any(|event| matches!(event, Event::RoundStarted { .. } | Event::LabelPlaced { .. }));
    if board_changed {
        write!(out, "{}", render::board(quiz.world()))?;
    }

    let finished = events
        .iter()
        .any(|event| matches!(event, Event::RoundFinished { .. }));
    if let Some(results) = render::results(quiz.world()).filter(|_| finished) {
        write!(out, "{results}")?;
    }
    Ok(())
}
