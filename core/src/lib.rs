#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the value types that connect the board, the navigation
//! and ghost systems, and the adapters. The board owns squares and units and
//! hands out [`SquareId`] and [`UnitId`] handles; systems read the board
//! through those handles and answer with [`Direction`] decisions that the
//! level driver applies through the occupation primitives.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cardinal movement directions available to units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    #[default]
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Neighbour expansion order shared by every breadth-first search.
    ///
    /// Ties between equally short routes are always resolved in this order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset travelled by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> CellOffset {
        match self {
            Self::North => CellOffset::new(0, -1),
            Self::East => CellOffset::new(1, 0),
            Self::South => CellOffset::new(0, 1),
            Self::West => CellOffset::new(-1, 0),
        }
    }

    /// Lowercase name used by adapters and configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a direction name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown direction `{0}`")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "up" => Ok(Self::North),
            "east" | "e" | "right" => Ok(Self::East),
            "south" | "s" | "down" => Ok(Self::South),
            "west" | "w" | "left" => Ok(Self::West),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Applies the offset, returning `None` when the result leaves a
    /// `columns` x `rows` grid.
    #[must_use]
    pub fn offset_within(self, offset: CellOffset, columns: u32, rows: u32) -> Option<Self> {
        let column = i64::from(self.column) + i64::from(offset.dx());
        let row = i64::from(self.row) + i64::from(offset.dy());
        if column < 0 || row < 0 || column >= i64::from(columns) || row >= i64::from(rows) {
            return None;
        }

        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        Some(Self::new(column, row))
    }

    /// Applies the offset on a torus of `columns` x `rows` cells.
    ///
    /// Returns `None` only for an empty grid.
    #[must_use]
    pub fn offset_wrapping(self, offset: CellOffset, columns: u32, rows: u32) -> Option<Self> {
        if columns == 0 || rows == 0 {
            return None;
        }

        let column = i64::from(self.column) + i64::from(offset.dx());
        let row = i64::from(self.row) + i64::from(offset.dy());
        let column = u32::try_from(column.rem_euclid(i64::from(columns))).ok()?;
        let row = u32::try_from(row.rem_euclid(i64::from(rows))).ok()?;
        Some(Self::new(column, row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Signed displacement between two cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOffset {
    dx: i32,
    dy: i32,
}

impl CellOffset {
    /// Offset that leaves a cell unchanged.
    pub const ZERO: CellOffset = CellOffset::new(0, 0);

    /// Creates an offset from column and row deltas.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Displacement that carries `from` onto `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Self {
        let dx = i64::from(to.column()) - i64::from(from.column());
        let dy = i64::from(to.row()) - i64::from(from.row());
        Self::new(saturate(dx), saturate(dy))
    }

    /// Column delta.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Row delta.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Multiplies both components by `factor`, saturating at the `i32` range.
    #[must_use]
    pub const fn scaled(self, factor: i32) -> Self {
        Self::new(
            self.dx.saturating_mul(factor),
            self.dy.saturating_mul(factor),
        )
    }

    /// Largest absolute component, the number of king moves the offset spans.
    #[must_use]
    pub const fn chebyshev_length(&self) -> u32 {
        let x = self.dx.unsigned_abs();
        let y = self.dy.unsigned_abs();
        if x > y {
            x
        } else {
            y
        }
    }

    /// Scales the offset by `numerator / denominator`, rounding each component
    /// half away from zero.
    ///
    /// A zero denominator yields [`CellOffset::ZERO`].
    #[must_use]
    pub fn fraction(self, numerator: i32, denominator: u32) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }

        let scale = |component: i32| {
            let product = i64::from(component) * i64::from(numerator);
            saturate(round_half_away(product, i64::from(denominator)))
        };
        Self::new(scale(self.dx), scale(self.dy))
    }
}

fn round_half_away(value: i64, denominator: i64) -> i64 {
    let magnitude = (value.abs() * 2 + denominator) / (denominator * 2);
    if value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn saturate(value: i64) -> i32 {
    let bound = if value < 0 { i32::MIN } else { i32::MAX };
    i32::try_from(value).unwrap_or(bound)
}

/// Handle of a square stored in a board's square arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SquareId(u32);

impl SquareId {
    /// Creates a new square handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle of a unit stored in a board's unit arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terrain stored in a square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open floor that moving units may path through.
    #[default]
    Floor,
    /// Solid wall that blocks movement.
    Wall,
}

impl CellKind {
    /// Reports whether moving units may stand on the cell.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// The four classic ghosts, distinguished by their targeting strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GhostKind {
    /// Chases the player's square directly.
    Blinky,
    /// Ambushes the square four ahead of the player.
    Pinky,
    /// Reflects Blinky through the square two ahead of the player.
    Inky,
    /// Chases from afar and retreats when close.
    Clyde,
}

impl GhostKind {
    /// Display name of the ghost.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blinky => "Blinky",
            Self::Pinky => "Pinky",
            Self::Inky => "Inky",
            Self::Clyde => "Clyde",
        }
    }
}

impl fmt::Display for GhostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Category of an entity that can occupy a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// The player-controlled unit.
    Player,
    /// An AI-controlled ghost.
    Ghost(GhostKind),
    /// A static pellet lying on the floor.
    Pellet,
}

impl UnitKind {
    /// Reports whether the unit is the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    /// Ghost kind of the unit, if it is a ghost.
    #[must_use]
    pub const fn ghost(self) -> Option<GhostKind> {
        match self {
            Self::Ghost(kind) => Some(kind),
            Self::Player | Self::Pellet => None,
        }
    }
}

/// Precondition violations reported by the board.
///
/// These are programming errors on the caller's side: absence outcomes such as
/// a missing path are expressed with `Option` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum BoardError {
    /// The unit is not placed on any square.
    #[error("unit {0:?} is not placed on any square")]
    UnitNotPlaced(UnitId),
    /// The requested coordinate lies outside the board.
    #[error("cell {cell} lies outside the {columns}x{rows} board")]
    OutOfBounds {
        /// Coordinate that was requested.
        cell: CellCoord,
        /// Number of columns in the board.
        columns: u32,
        /// Number of rows in the board.
        rows: u32,
    },
    /// The unit handle does not belong to this board.
    #[error("unit {0:?} does not belong to this board")]
    UnknownUnit(UnitId),
    /// The square handle does not belong to this board.
    #[error("square {0:?} does not belong to this board")]
    UnknownSquare(SquareId),
    /// The requested board has no cells or exceeds the addressable size.
    #[error("a board cannot be {columns}x{rows}")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{BoardError, CellCoord, CellOffset, Direction, GhostKind, UnitId, UnitKind};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn direction_order_is_north_east_south_west() {
        let expected = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        assert_eq!(Direction::ALL, expected);
        assert_eq!(Direction::default(), Direction::East);
    }

    #[test]
    fn direction_deltas_follow_screen_axes() {
        assert_eq!(Direction::North.delta(), CellOffset::new(0, -1));
        assert_eq!(Direction::South.delta(), CellOffset::new(0, 1));
        assert_eq!(Direction::West.delta(), CellOffset::new(-1, 0));
        assert_eq!(Direction::East.delta().scaled(3), CellOffset::new(3, 0));
    }

    #[test]
    fn direction_parses_names_and_aliases() {
        assert_eq!("North".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("left".parse::<Direction>(), Ok(Direction::West));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn offset_within_rejects_cells_outside_grid() {
        let cell = CellCoord::new(0, 2);
        assert_eq!(cell.offset_within(CellOffset::new(-1, 0), 4, 4), None);
        assert_eq!(
            cell.offset_within(CellOffset::new(3, 1), 4, 4),
            Some(CellCoord::new(3, 3))
        );
        assert_eq!(cell.offset_within(CellOffset::new(4, 0), 4, 4), None);
    }

    #[test]
    fn offset_wrapping_folds_onto_torus() {
        let cell = CellCoord::new(0, 0);
        assert_eq!(
            cell.offset_wrapping(CellOffset::new(-1, -6), 5, 4),
            Some(CellCoord::new(4, 2))
        );
        assert_eq!(cell.offset_wrapping(CellOffset::new(1, 1), 0, 4), None);
    }

    #[test]
    fn offset_between_is_signed() {
        let offset = CellOffset::between(CellCoord::new(4, 2), CellCoord::new(1, 5));
        assert_eq!(offset, CellOffset::new(-3, 3));
        assert_eq!(offset.chebyshev_length(), 3);
    }

    #[test]
    fn fraction_rounds_half_away_from_zero() {
        let offset = CellOffset::new(4, -1);
        assert_eq!(offset.fraction(3, 4), CellOffset::new(3, -1));
        assert_eq!(offset.fraction(2, 4), CellOffset::new(2, -1));
        assert_eq!(offset.fraction(1, 4), CellOffset::new(1, 0));
        assert_eq!(offset.fraction(-1, 4), CellOffset::new(-1, 0));
        assert_eq!(offset.fraction(1, 0), CellOffset::ZERO);
    }

    #[test]
    fn unit_kind_reports_ghost_kind() {
        let inky = UnitKind::Ghost(GhostKind::Inky);
        assert_eq!(inky.ghost(), Some(GhostKind::Inky));
        assert_eq!(UnitKind::Player.ghost(), None);
        assert!(UnitKind::Player.is_player());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn unit_kind_round_trips_through_bincode() {
        assert_round_trip(&UnitKind::Ghost(GhostKind::Clyde));
    }

    #[test]
    fn board_error_round_trips_through_bincode() {
        assert_round_trip(&BoardError::UnitNotPlaced(UnitId::new(7)));
        assert_round_trip(&BoardError::OutOfBounds {
            cell: CellCoord::new(9, 9),
            columns: 4,
            rows: 3,
        });
    }
}
