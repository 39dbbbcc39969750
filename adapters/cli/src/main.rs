#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Maze Chase ghosts over a text map.

mod targeting_config;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_chase_board::query;
use maze_chase_core::{CellCoord, Direction, GhostKind, UnitKind};
use maze_chase_ghost_ai::TargetingConfig;
use maze_chase_level::{GhostMove, Level, MapParser, MoveSource};

/// Runs the ghosts of a Maze Chase map for a number of ticks.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about)]
struct CliArgs {
    /// Text map to load.
    #[arg(long)]
    map: PathBuf,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 10)]
    ticks: u32,
    /// Seed for the random moves of ghosts without a target.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file with ghost targeting tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Direction the player faces.
    #[arg(long, default_value_t = Direction::East)]
    player_direction: Direction,
    /// Link opposite board edges.
    #[arg(long)]
    wrap: bool,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();
    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    let targeting = match &args.config {
        Some(path) => targeting_config::load(path)?,
        None => TargetingConfig::default(),
    };
    let mut level = load_level(args, targeting)?;

    if level.start_squares().is_empty() {
        info!("map has no start square; ghosts will wander");
    } else {
        let player = level.register_player().context("failed to place player")?;
        level
            .board_mut()
            .set_facing(player, args.player_direction)
            .context("failed to turn player")?;
    }

    for _ in 0..args.ticks {
        let moves = level.tick();
        for step in &moves {
            println!("tick {:>3}: {}", level.tick_index(), describe(&level, step));
        }
    }
    println!("{}", render(&level));
    Ok(())
}

fn load_level(args: &CliArgs, targeting: TargetingConfig) -> Result<Level> {
    let text = fs::read_to_string(&args.map)
        .with_context(|| format!("failed to read map at {}", args.map.display()))?;
    let rows: Vec<&str> = text.lines().filter(|row| !row.is_empty()).collect();
    MapParser::default()
        .with_targeting(targeting)
        .with_seed(args.seed)
        .wrapping(args.wrap)
        .parse(&rows)
        .with_context(|| format!("failed to parse map at {}", args.map.display()))
}

fn describe(level: &Level, step: &GhostMove) -> String {
    let board = level.board();
    let cell = board
        .placement(step.unit)
        .and_then(|square| board.cell_of(square).ok())
        .map_or_else(|| "off board".to_owned(), |cell| cell.to_string());
    let direction = step.direction.map_or("stays", Direction::name);
    let source = match step.source {
        MoveSource::Ai => "ai",
        MoveSource::Random => "random",
        MoveSource::Idle => "idle",
    };
    let blocked = if step.direction.is_some() && !step.moved {
        " (blocked)"
    } else {
        ""
    };
    let kind = step.kind;
    format!("{kind:<6} {direction:<5} [{source}] -> {cell}{blocked}")
}

fn render(level: &Level) -> String {
    let board = level.board();
    let mut rows: Vec<Vec<char>> = (0..board.rows())
        .map(|row| {
            (0..board.columns())
                .map(|column| match board.square_at(CellCoord::new(column, row)) {
                    Ok(square) if board.is_traversable(square) => ' ',
                    _ => '#',
                })
                .collect()
        })
        .collect();

    for unit in query::unit_view(board).iter() {
        let symbol = match unit.kind {
            UnitKind::Player => 'P',
            UnitKind::Pellet => '.',
            UnitKind::Ghost(GhostKind::Blinky) => 'B',
            UnitKind::Ghost(GhostKind::Pinky) => 'Y',
            UnitKind::Ghost(GhostKind::Inky) => 'I',
            UnitKind::Ghost(GhostKind::Clyde) => 'C',
        };
        let slot = rows
            .get_mut(unit.cell.row() as usize)
            .and_then(|row| row.get_mut(unit.cell.column() as usize));
        if let Some(slot) = slot {
            if *slot == ' ' || unit.kind != UnitKind::Pellet {
                *slot = symbol;
            }
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
