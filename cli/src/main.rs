use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twofold_core::GameConfig;

mod frontend;
mod input;
mod session;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// TOML file with game settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Frames every slide, merge and spawn animation takes
    #[arg(long, global = true)]
    frames: Option<u32>,

    /// Tiles placed when a game starts
    #[arg(long, global = true)]
    initial_tiles: Option<u16>,

    /// Tiles spawned after every move
    #[arg(long, global = true)]
    tiles_per_move: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively on the terminal (default)
    Play,
    /// Let a random player run whole games and report the results
    Auto {
        /// How many games to play
        #[arg(short, long, default_value_t = 1)]
        games: usize,
        /// Stop a game after this many moves
        #[arg(long)]
        max_moves: Option<usize>,
        /// Print one JSON object per game
        #[arg(long)]
        json: bool,
    },
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct Settings {
    frames: u32,
    #[serde(flatten)]
    game: GameConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frames: 3,
            game: GameConfig::default(),
        }
    }
}

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Could not parse {}", path.display()))
}

fn init_logging(args: &Args) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(args.verbose.tracing_level_filter());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(frames) = args.frames {
        settings.frames = frames;
    }
    if let Some(count) = args.initial_tiles {
        settings.game.initial_tile_count = count;
    }
    if let Some(count) = args.tiles_per_move {
        settings.game.tiles_per_move = count;
    }
    settings.game.validate().context("Invalid game settings")?;

    let seed = args.seed.unwrap_or_else(random_seed);
    tracing::debug!(seed, ?settings, "starting");

    match args.command.unwrap_or(Command::Play) {
        Command::Play => {
            let mut engine = session::new_engine(settings.game, seed, settings.frames);
            session::play(&mut engine, std::io::stdin().lock(), std::io::stdout().lock())
        }
        Command::Auto {
            games,
            max_moves,
            json,
        } => {
            let reports: Vec<_> = (0..games)
                .map(|game| {
                    session::autoplay(
                        settings.game,
                        game,
                        seed.wrapping_add(game as u64),
                        settings.frames,
                        max_moves.unwrap_or(usize::MAX),
                    )
                })
                .collect();
            session::print_reports(&reports, json, std::io::stdout().lock())
        }
    }
}
