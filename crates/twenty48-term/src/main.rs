mod config;
mod store;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use twenty48_core::{BestScoreStore, GameSession, NullStore};

use config::{Config, Storage};
use store::SqliteStore;
use ui::Command;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Board size for the first game (overrides config)
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// RNG seed for a reproducible game (overrides config)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Directory for the best-score database (overrides config)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Don't persist the best score
    #[arg(long)]
    no_store: bool,

    /// Log filter, e.g. "warn", "debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log.as_str())).init();

    let mut config = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }
    if args.no_store {
        config.storage.enabled = false;
    }
    debug!("config: {config:?}");

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new(config.rules.clone(), rng, open_store(&config.storage));
    session
        .new_game(config.size)
        .with_context(|| format!("cannot start a game of size {}", config.size))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "{}\n\n{}", ui::HELP, ui::render(&session))?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match ui::parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Move(direction)) => {
                if let Some(report) = session.play(direction) {
                    if !report.changed {
                        writeln!(stdout, "Nothing moves that way.")?;
                    }
                }
            }
            Some(Command::NewGame(size)) => {
                let size = size.unwrap_or(session.board().size());
                if let Err(err) = session.new_game(size) {
                    warn!("ignoring new game request: {err}");
                    writeln!(stdout, "{err}")?;
                }
            }
            Some(Command::Continue) => {
                session.continue_playing();
            }
            Some(Command::Help) => writeln!(stdout, "{}", ui::HELP)?,
            None => debug!("ignoring input {line:?}"),
        }
        write!(stdout, "{}", ui::render(&session))?;
        stdout.flush()?;
    }

    info!(
        "leaving with score {}, best {}",
        session.score(),
        session.best_score()
    );
    Ok(())
}

/// Open the configured best-score store. Storage that is disabled or can't
/// be opened falls back to `NullStore` so the game still runs.
fn open_store(storage: &Storage) -> Box<dyn BestScoreStore> {
    if !storage.enabled {
        return Box::new(NullStore);
    }
    match SqliteStore::open(&storage.data_dir) {
        Ok(store) => {
            info!("best score stored in {}", store.data_dir().display());
            Box::new(store)
        }
        Err(err) => {
            warn!("best score will not be saved: {err:#}");
            Box::new(NullStore)
        }
    }
}
