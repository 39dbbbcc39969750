//! Blinky, Pinky and Clyde, plus the lookups every strategy shares.

use maze_chase_board::Board;
use maze_chase_core::{CellCoord, Direction, GhostKind, SquareId, UnitId};
use maze_chase_navigation::{find_nearest_unit, nearest_traversable, path_length};

use crate::{TargetStrategy, TargetingConfig};

const PINKY_LOOKAHEAD: u32 = 4;

/// Closest player reachable from `from`.
pub(crate) fn locate_player(board: &Board, from: SquareId) -> Option<UnitId> {
    find_nearest_unit(board, from, |_, kind| kind.is_player())
}

/// Closest ghost of `kind` reachable from `from`.
pub(crate) fn locate_ghost(board: &Board, from: SquareId, kind: GhostKind) -> Option<UnitId> {
    find_nearest_unit(board, from, |_, candidate| candidate.ghost() == Some(kind))
}

/// Square `steps` ahead of the unit.
///
/// With the north quirk enabled, a unit facing north also has the result
/// shifted `steps` squares west. `None` once either walk leaves the board.
pub(crate) fn look_ahead(
    board: &Board,
    unit: UnitId,
    steps: u32,
    config: TargetingConfig,
) -> Option<SquareId> {
    let ahead = board.squares_ahead_of(unit, steps).ok()??;
    if config.north_offset_quirk() && board.facing(unit).ok()? == Direction::North {
        let shift = i32::try_from(steps).ok()?;
        let west = Direction::West.delta().scaled(shift);
        return board.offset_square(ahead, west);
    }
    Some(ahead)
}

/// Targets the player's square directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlinkyStrategy;

impl TargetStrategy for BlinkyStrategy {
    fn target(&self, board: &Board, ghost: UnitId) -> Option<SquareId> {
        let origin = board.placement(ghost)?;
        let player = locate_player(board, origin)?;
        board.placement(player)
    }
}

/// Targets the square four ahead of the player, ambushing from the front.
///
/// Falls back to the player's square when that look-ahead leaves the board or
/// lands on a wall.
#[derive(Clone, Copy, Debug, Default)]
pub struct PinkyStrategy {
    config: TargetingConfig,
}

impl PinkyStrategy {
    /// Creates the strategy with the provided tunables.
    #[must_use]
    pub const fn new(config: TargetingConfig) -> Self {
        Self { config }
    }
}

impl TargetStrategy for PinkyStrategy {
    fn target(&self, board: &Board, ghost: UnitId) -> Option<SquareId> {
        let origin = board.placement(ghost)?;
        let player = locate_player(board, origin)?;
        look_ahead(board, player, PINKY_LOOKAHEAD, self.config)
            .filter(|square| board.is_traversable(*square))
            .or_else(|| board.placement(player))
    }
}

/// Chases the player from afar and heads for the bottom-left corner once the
/// player is closer than the configured shyness distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClydeStrategy {
    config: TargetingConfig,
}

impl ClydeStrategy {
    /// Creates the strategy with the provided tunables.
    #[must_use]
    pub const fn new(config: TargetingConfig) -> Self {
        Self { config }
    }

    /// Open square nearest to the bottom-left corner of the board.
    #[must_use]
    pub fn scatter_corner(board: &Board) -> Option<SquareId> {
        let bottom = board.rows().saturating_sub(1);
        let corner = board.square_at(CellCoord::new(0, bottom)).ok()?;
        nearest_traversable(board, corner)
    }
}

impl TargetStrategy for ClydeStrategy {
    fn target(&self, board: &Board, ghost: UnitId) -> Option<SquareId> {
        let origin = board.placement(ghost)?;
        let player = locate_player(board, origin)?;
        let player_square = board.placement(player)?;
        let shyness = self.config.clyde_shyness();
        let shyness = usize::try_from(shyness).unwrap_or(usize::MAX);
        match path_length(board, origin, player_square) {
            Some(distance) if distance < shyness => Self::scatter_corner(board),
            _ => Some(player_square),
        }
    }
}
