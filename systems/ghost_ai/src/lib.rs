#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ghost decision making for Maze Chase.
//!
//! Every ghost runs the same cycle once per tick: its [`TargetStrategy`]
//! picks a target square from the current board, and the navigation system
//! turns that square into the first step of a shortest route. Ghost kinds
//! differ only in the strategy they are built with.

use std::fmt;

use log::debug;
use maze_chase_board::Board;
use maze_chase_core::{Direction, GhostKind, SquareId, UnitId};
use maze_chase_navigation::direction_to_target;
use serde::{Deserialize, Serialize};

mod inky;
mod strategies;

pub use inky::{resolve_reflection, InkyStrategy};
pub use strategies::{BlinkyStrategy, ClydeStrategy, PinkyStrategy};

/// Default shortest-path distance below which Clyde retreats.
pub const DEFAULT_CLYDE_SHYNESS: u32 = 8;

/// Tunables shared by the targeting strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    north_offset_quirk: bool,
    clyde_shyness: u32,
}

impl TargetingConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(north_offset_quirk: bool, clyde_shyness: u32) -> Self {
        Self {
            north_offset_quirk,
            clyde_shyness,
        }
    }

    /// Whether look-ahead targets of a north-facing player also shift west by
    /// the same number of squares, as in the arcade original.
    #[must_use]
    pub const fn north_offset_quirk(&self) -> bool {
        self.north_offset_quirk
    }

    /// Distance in steps below which Clyde heads for his corner instead.
    #[must_use]
    pub const fn clyde_shyness(&self) -> u32 {
        self.clyde_shyness
    }
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self::new(true, DEFAULT_CLYDE_SHYNESS)
    }
}

/// Chooses the square a ghost currently moves toward.
///
/// Implementations are pure functions of the board: they locate whatever
/// reference units they need and return `None` when the target cannot be
/// determined this tick.
pub trait TargetStrategy: fmt::Debug {
    /// Computes the target square for `ghost` on `board`.
    fn target(&self, board: &Board, ghost: UnitId) -> Option<SquareId>;
}

/// Builds the targeting strategy that belongs to the ghost kind.
#[must_use]
pub fn strategy_for(kind: GhostKind, config: TargetingConfig) -> Box<dyn TargetStrategy> {
    match kind {
        GhostKind::Blinky => Box::new(BlinkyStrategy),
        GhostKind::Pinky => Box::new(PinkyStrategy::new(config)),
        GhostKind::Inky => Box::new(InkyStrategy::new(config)),
        GhostKind::Clyde => Box::new(ClydeStrategy::new(config)),
    }
}

/// AI-controlled unit paired with its targeting strategy.
#[derive(Debug)]
pub struct Ghost {
    unit: UnitId,
    kind: GhostKind,
    strategy: Box<dyn TargetStrategy>,
}

impl Ghost {
    /// Pairs a ghost unit with an explicit strategy.
    #[must_use]
    pub fn new(unit: UnitId, kind: GhostKind, strategy: Box<dyn TargetStrategy>) -> Self {
        Self {
            unit,
            kind,
            strategy,
        }
    }

    /// Pairs a ghost unit with the strategy of its kind.
    #[must_use]
    pub fn of_kind(unit: UnitId, kind: GhostKind, config: TargetingConfig) -> Self {
        Self::new(unit, kind, strategy_for(kind, config))
    }

    /// Board handle of the ghost's unit.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    /// Kind of the ghost.
    #[must_use]
    pub const fn kind(&self) -> GhostKind {
        self.kind
    }

    /// Square the strategy currently aims for.
    #[must_use]
    pub fn target(&self, board: &Board) -> Option<SquareId> {
        self.strategy.target(board, self.unit)
    }

    /// Direction of the ghost's next step, or `None` when it idles this tick.
    ///
    /// A ghost idles when it is not on the board, when its strategy cannot
    /// find a target, when it already stands on the target, or when the
    /// target is unreachable.
    #[must_use]
    pub fn next_ai_move(&self, board: &Board) -> Option<Direction> {
        let origin = board.placement(self.unit)?;
        let Some(target) = self.target(board) else {
            debug!("{} has no target", self.kind);
            return None;
        };

        let direction = direction_to_target(board, origin, target);
        debug!(
            "{} at {:?} targets {:?}: {:?}",
            self.kind,
            board.cell_of(origin).ok(),
            board.cell_of(target).ok(),
            direction
        );
        direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_enables_arcade_quirk() {
        let config = TargetingConfig::default();
        assert!(config.north_offset_quirk());
        assert_eq!(config.clyde_shyness(), DEFAULT_CLYDE_SHYNESS);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let config: TargetingConfig = toml::from_str("clyde_shyness = 3").expect("valid config");
        assert_eq!(config, TargetingConfig::new(true, 3));

        let contents = "north_offset_quirk = false";
        let config: TargetingConfig = toml::from_str(contents).expect("valid config");
        assert_eq!(config, TargetingConfig::new(false, DEFAULT_CLYDE_SHYNESS));
    }

    #[test]
    fn ghost_reports_unit_and_kind() {
        let ghost = Ghost::of_kind(UnitId::new(4), GhostKind::Pinky, TargetingConfig::default());
        assert_eq!(ghost.unit(), UnitId::new(4));
        assert_eq!(ghost.kind(), GhostKind::Pinky);
    }
}
