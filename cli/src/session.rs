use std::io::{BufRead, Write};

use anyhow::Context;
use rand::prelude::*;
use rand::rngs::SmallRng;
use serde::Serialize;
use twofold_core::*;

use crate::frontend::*;
use crate::input::*;

pub fn new_engine(config: GameConfig, seed: u64, frames: u32) -> Engine {
    GameEngine::new(config, seed, FrameRenderer::new(frames), ScoreBoard::default())
}

fn draw(engine: &Engine, out: &mut impl Write) -> anyhow::Result<()> {
    let board = engine.listener();
    writeln!(out, "Score: {}  Best: {}", board.score, board.best)?;
    write!(out, "{}", engine.renderer().render())?;
    if board.game_over {
        writeln!(out, "Game over! Press r to restart or q to quit.")?;
    }
    out.flush()?;
    Ok(())
}

/// Reads commands line by line and plays them until `q` or end of input.
pub fn play(engine: &mut Engine, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
    writeln!(out, "{HELP}")?;
    draw(engine, &mut out)?;

    for line in input.lines() {
        let line = line.context("Could not read input")?;
        let Some(command) = parse_command(&line) else {
            writeln!(out, "Unknown command {:?}, ? for help", line.trim())?;
            continue;
        };

        match command {
            Command::Move(direction) => {
                let outcome = engine.resolve_move(direction);
                log::debug!("{direction:?}: {outcome:?}");
                if outcome == MoveOutcome::NoChange {
                    writeln!(out, "Nothing moves that way.")?;
                    continue;
                }
                let frames = run_until_idle(engine);
                log::trace!("settled after {frames} frames");
            }
            Command::Restart => engine.reset(),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        }
        draw(engine, &mut out)?;
    }

    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameReport {
    pub game: usize,
    pub seed: u64,
    pub score: Score,
    pub max_tile: TileValue,
    pub moves: usize,
    pub frames: u64,
    pub finished: bool,
}

/// Plays one game picking uniformly among the directions that change the board.
pub fn autoplay(
    config: GameConfig,
    game: usize,
    seed: u64,
    frames: u32,
    max_moves: usize,
) -> GameReport {
    let mut engine = new_engine(config, seed, frames);
    let mut rng = SmallRng::seed_from_u64(seed.rotate_left(32));
    let mut moves = 0;
    let mut total_frames = u64::from(run_until_idle(&mut engine));

    while !engine.is_over() && moves < max_moves {
        let available = available_moves(engine.grid());
        let Some(&direction) = available.get(rng.random_range(0..available.len().max(1))) else {
            break;
        };

        let outcome = engine.resolve_move(direction);
        debug_assert_eq!(outcome, MoveOutcome::Moved);
        total_frames += u64::from(run_until_idle(&mut engine));
        moves += 1;
    }

    let snapshot = engine.snapshot();
    log::info!(
        "Game {game} (seed {seed}): score {} max tile {} after {moves} moves",
        snapshot.score,
        snapshot.max_tile()
    );
    GameReport {
        game,
        seed,
        score: snapshot.score,
        max_tile: snapshot.max_tile(),
        moves,
        frames: total_frames,
        finished: engine.is_over(),
    }
}

pub fn print_reports(
    reports: &[GameReport],
    json: bool,
    mut out: impl Write,
) -> anyhow::Result<()> {
    if json {
        for report in reports {
            serde_json::to_writer(&mut out, report)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    for report in reports {
        writeln!(
            out,
            "game {:>3}  seed {:>20}  score {:>7}  max {:>5}  moves {:>5}{}",
            report.game,
            report.seed,
            report.score,
            report.max_tile,
            report.moves,
            if report.finished { "" } else { "  (stopped)" }
        )?;
    }
    if let Some(best) = reports.iter().map(|report| report.score).max() {
        let total: Score = reports.iter().map(|report| report.score).sum();
        let mean = total / reports.len() as Score;
        writeln!(out, "best {best}  mean {mean}")?;
    }
    Ok(())
}
