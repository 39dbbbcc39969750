//! Inky's pincer targeting.
//!
//! Inky aims at the reflection of Blinky through the pivot two squares ahead
//! of the player: `target = pivot + (pivot - blinky)`. The reflection often
//! lands on a wall or outside the board, so it is resolved by walking the
//! straight line from the reflection back through the pivot toward Blinky and
//! taking the first open square on the board. Blinky's own square ends the
//! walk, so the search is bounded.

use maze_chase_board::Board;
use maze_chase_core::{CellOffset, GhostKind, SquareId, UnitId};

use crate::strategies::{locate_ghost, locate_player, look_ahead};
use crate::{TargetStrategy, TargetingConfig};

const INKY_LOOKAHEAD: u32 = 2;

/// Reflects Blinky through the square two ahead of the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct InkyStrategy {
    config: TargetingConfig,
}

impl InkyStrategy {
    /// Creates the strategy with the provided tunables.
    #[must_use]
    pub const fn new(config: TargetingConfig) -> Self {
        Self { config }
    }
}

impl TargetStrategy for InkyStrategy {
    fn target(&self, board: &Board, ghost: UnitId) -> Option<SquareId> {
        let origin = board.placement(ghost)?;
        let player = locate_player(board, origin)?;
        let blinky = locate_ghost(board, origin, GhostKind::Blinky)?;
        let pivot = look_ahead(board, player, INKY_LOOKAHEAD, self.config)?;
        let anchor = board.placement(blinky)?;
        resolve_reflection(board, pivot, anchor)
    }
}

/// Resolves the reflection of `anchor` through `pivot` to an open square.
///
/// With `v = pivot - anchor` and `n` the larger of `|v.x|` and `|v.y|`, the
/// candidates are `pivot + v * k / n` for `k = n, n - 1, ..., -n`, each
/// component rounded half away from zero. The first candidate that lies on
/// the board and is traversable wins; `k = n` is the exact reflection and
/// `k = -n` is the anchor itself. Returns `None` only if every candidate,
/// the anchor included, is blocked. On a wrapping board every candidate
/// wraps onto the far edge, so only walls are skipped.
#[must_use]
pub fn resolve_reflection(board: &Board, pivot: SquareId, anchor: SquareId) -> Option<SquareId> {
    let pivot_cell = board.cell_of(pivot).ok()?;
    let anchor_cell = board.cell_of(anchor).ok()?;
    let arm = CellOffset::between(anchor_cell, pivot_cell);
    let reach = arm.chebyshev_length();
    let span = i32::try_from(reach).ok()?;

    (-span..=span)
        .rev()
        .filter_map(|step| board.offset_square(pivot, arm.fraction(step, reach)))
        .find(|square| board.is_traversable(*square))
}
