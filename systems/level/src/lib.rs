#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level loading and the per-tick ghost driver for Maze Chase.
//!
//! A [`Level`] is parsed from a text map, owns the board and the ghosts
//! standing on it, and advances the ghosts one square per [`Level::tick`].
//! Each tick first decides every ghost's move against the same immutable
//! board and only then applies the moves, so no ghost reacts to a move made
//! by another ghost within the same tick.

use log::{debug, warn};
use maze_chase_board::{Board, BoardConfig};
use maze_chase_core::{
    BoardError, CellCoord, CellKind, Direction, GhostKind, SquareId, UnitId, UnitKind,
};
use maze_chase_ghost_ai::{Ghost, TargetingConfig};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x6d2b_79f5_0000_0001;

/// Reasons a text map cannot be turned into a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The map contains no rows or only empty rows.
    #[error("map is empty")]
    EmptyMap,
    /// A row's width differs from the first row's.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The map contains a character with no meaning.
    #[error("unknown map character {symbol:?} at column {column}, row {row}")]
    UnknownCell {
        /// Character that was found.
        symbol: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// A player was registered on a map without `P` squares.
    #[error("map has no player start square")]
    NoStartSquare,
    /// The board rejected an operation.
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Turns text maps into levels.
///
/// `#` is a wall, a space is open floor, `.` is floor holding a pellet, `P`
/// marks a player start square, and `B`, `Y`, `I` and `C` place Blinky,
/// Pinky, Inky and Clyde on open floor.
#[derive(Clone, Copy, Debug)]
pub struct MapParser {
    targeting: TargetingConfig,
    seed: u64,
    wraps: bool,
}

impl Default for MapParser {
    fn default() -> Self {
        Self {
            targeting: TargetingConfig::default(),
            seed: DEFAULT_SEED,
            wraps: false,
        }
    }
}

impl MapParser {
    /// Uses the provided targeting tunables for every ghost.
    #[must_use]
    pub const fn with_targeting(self, targeting: TargetingConfig) -> Self {
        Self { targeting, ..self }
    }

    /// Seeds the random fallback moves of the parsed level.
    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Makes the parsed board wrap around at its edges.
    #[must_use]
    pub const fn wrapping(self, wraps: bool) -> Self {
        Self { wraps, ..self }
    }

    /// Parses the rows of a map.
    pub fn parse<S: AsRef<str>>(&self, rows: &[S]) -> Result<Level, LevelError> {
        let grid: Vec<Vec<char>> = rows
            .iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        let width = grid.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(LevelError::EmptyMap);
        }
        if let Some(row) = grid.iter().position(|line| line.len() != width) {
            return Err(LevelError::RaggedRow {
                row,
                expected: width,
                found: grid[row].len(),
            });
        }

        let mut cells = Vec::with_capacity(width * grid.len());
        let mut placements = Vec::new();
        for (row, line) in grid.iter().enumerate() {
            for (column, symbol) in line.iter().copied().enumerate() {
                let Some((kind, occupant)) = decode(symbol) else {
                    return Err(LevelError::UnknownCell {
                        symbol,
                        column,
                        row,
                    });
                };
                cells.push(kind);
                if let Some(occupant) = occupant {
                    let cell = CellCoord::new(column as u32, row as u32);
                    placements.push((cell, occupant));
                }
            }
        }

        let dimensions = BoardConfig::new(width as u32, grid.len() as u32);
        let config = dimensions.wrapping(self.wraps);
        let mut board = Board::from_cells(config, cells)?;
        let mut ghosts = Vec::new();
        let mut start_squares = Vec::new();
        for (cell, occupant) in placements {
            let square = board.square_at(cell)?;
            match occupant {
                Occupant::Start => start_squares.push(square),
                Occupant::Unit(kind) => {
                    let unit = board.add_unit(kind);
                    board.occupy(square, unit)?;
                    if let Some(ghost) = kind.ghost() {
                        ghosts.push(Ghost::of_kind(unit, ghost, self.targeting));
                    }
                }
            }
        }

        debug!(
            "parsed {}x{} map with {} ghosts and {} start squares",
            board.columns(),
            board.rows(),
            ghosts.len(),
            start_squares.len()
        );
        Ok(Level {
            board,
            ghosts,
            start_squares,
            players: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            tick_index: 0,
        })
    }
}

#[derive(Clone, Copy, Debug)]
enum Occupant {
    Start,
    Unit(UnitKind),
}

fn decode(symbol: char) -> Option<(CellKind, Option<Occupant>)> {
    let ghost = |kind| Occupant::Unit(UnitKind::Ghost(kind));
    let occupant = match symbol {
        '#' => return Some((CellKind::Wall, None)),
        ' ' => None,
        '.' => Some(Occupant::Unit(UnitKind::Pellet)),
        'P' => Some(Occupant::Start),
        'B' => Some(ghost(GhostKind::Blinky)),
        'Y' => Some(ghost(GhostKind::Pinky)),
        'I' => Some(ghost(GhostKind::Inky)),
        'C' => Some(ghost(GhostKind::Clyde)),
        _ => return None,
    };
    Some((CellKind::Floor, occupant))
}

/// How a ghost's move for the tick was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSource {
    /// The ghost's targeting strategy produced the direction.
    Ai,
    /// The strategy had no move, so an open neighbour was picked at random.
    Random,
    /// Neither the strategy nor the fallback found anywhere to go.
    Idle,
}

/// Outcome of one ghost's turn within a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostMove {
    /// Board handle of the ghost.
    pub unit: UnitId,
    /// Kind of the ghost.
    pub kind: GhostKind,
    /// Direction chosen for the tick, if any.
    pub direction: Option<Direction>,
    /// How the direction was chosen.
    pub source: MoveSource,
    /// Whether the ghost actually changed squares.
    pub moved: bool,
}

/// A parsed map: the board, its ghosts and the registered players.
#[derive(Debug)]
pub struct Level {
    board: Board,
    ghosts: Vec<Ghost>,
    start_squares: Vec<SquareId>,
    players: Vec<UnitId>,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl Level {
    /// Parses a map with the default parser settings.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        MapParser::default().parse(rows)
    }

    /// Read-only access to the board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board, for turning or relocating units.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Ghosts in map order.
    #[must_use]
    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    /// First ghost of the provided kind, in map order.
    #[must_use]
    pub fn ghost_of_kind(&self, kind: GhostKind) -> Option<&Ghost> {
        self.ghosts.iter().find(|ghost| ghost.kind() == kind)
    }

    /// Squares marked `P` in the map, in reading order.
    #[must_use]
    pub fn start_squares(&self) -> &[SquareId] {
        &self.start_squares
    }

    /// Players registered so far.
    #[must_use]
    pub fn players(&self) -> &[UnitId] {
        &self.players
    }

    /// Number of ticks played.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Creates a player and places it on the next start square.
    ///
    /// Start squares are handed out in reading order and reused cyclically
    /// once every one has been taken.
    pub fn register_player(&mut self) -> Result<UnitId, LevelError> {
        if self.start_squares.is_empty() {
            return Err(LevelError::NoStartSquare);
        }

        let square = self.start_squares[self.players.len() % self.start_squares.len()];
        let player = self.board.add_unit(UnitKind::Player);
        self.board.occupy(square, player)?;
        self.players.push(player);
        debug!(
            "registered player {} at {:?}",
            player.get(),
            self.board.cell_of(square).ok()
        );
        Ok(player)
    }

    /// Advances every ghost by at most one square.
    ///
    /// All decisions are taken against the board as it stood when the tick
    /// began; the moves are applied afterwards in map order.
    pub fn tick(&mut self) -> Vec<GhostMove> {
        self.tick_index = self.tick_index.saturating_add(1);
        let decisions: Vec<(Option<Direction>, MoveSource)> = self
            .ghosts
            .iter()
            .map(|ghost| decide(&self.board, ghost, &mut self.rng))
            .collect();

        let mut moves = Vec::with_capacity(decisions.len());
        for (ghost, (direction, source)) in self.ghosts.iter().zip(decisions) {
            let moved = match direction {
                Some(direction) => apply_step(&mut self.board, ghost.unit(), direction),
                None => false,
            };
            moves.push(GhostMove {
                unit: ghost.unit(),
                kind: ghost.kind(),
                direction,
                source,
                moved,
            });
        }

        debug!(
            "tick {}: {} of {} ghosts moved",
            self.tick_index,
            moves.iter().filter(|step| step.moved).count(),
            moves.len()
        );
        moves
    }
}

fn decide(board: &Board, ghost: &Ghost, rng: &mut ChaCha8Rng) -> (Option<Direction>, MoveSource) {
    if let Some(direction) = ghost.next_ai_move(board) {
        return (Some(direction), MoveSource::Ai);
    }

    let Some(square) = board.placement(ghost.unit()) else {
        return (None, MoveSource::Idle);
    };
    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| {
            board
                .neighbor(square, *direction)
                .map_or(false, |next| board.is_traversable(next))
        })
        .collect();
    match open.choose(rng) {
        Some(direction) => (Some(*direction), MoveSource::Random),
        None => (None, MoveSource::Idle),
    }
}

fn apply_step(board: &mut Board, unit: UnitId, direction: Direction) -> bool {
    let Some(square) = board.placement(unit) else {
        return false;
    };
    if board.set_facing(unit, direction).is_err() {
        return false;
    }

    match board.neighbor(square, direction) {
        Some(next) if board.is_traversable(next) => board.occupy(next, unit).is_ok(),
        _ => {
            warn!(
                "unit {} cannot step {direction} from {:?}",
                unit.get(),
                board.cell_of(square).ok()
            );
            false
        }
    }
}
