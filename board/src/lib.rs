#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Maze Chase.
//!
//! The [`Board`] owns every square and every unit in two arenas addressed by
//! [`SquareId`] and [`UnitId`]. A unit records the square it stands on and the
//! square lists the unit among its occupants; [`Board::occupy`] and
//! [`Board::leave`] are the only operations that touch either side, so the two
//! records can never disagree.
//!
//! Occupancy changes take `&mut Board`. Hosts that share a board between
//! threads wrap it in a single `Mutex`, which keeps every compound
//! remove-then-add move atomic for concurrent readers.

use log::trace;
use maze_chase_core::{
    BoardError, CellCoord, CellKind, CellOffset, Direction, SquareId, UnitId, UnitKind,
};

/// Dimensions and topology of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardConfig {
    columns: u32,
    rows: u32,
    wraps: bool,
}

impl BoardConfig {
    /// Describes a `columns` x `rows` board whose edges do not wrap.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            wraps: false,
        }
    }

    /// Enables or disables toroidal wraparound at the board edges.
    #[must_use]
    pub const fn wrapping(self, wraps: bool) -> Self {
        Self { wraps, ..self }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether stepping off one edge re-enters at the opposite edge.
    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.wraps
    }

    fn cell_count(&self) -> Result<usize, BoardError> {
        let invalid = BoardError::InvalidDimensions {
            columns: self.columns,
            rows: self.rows,
        };
        if self.columns == 0 || self.rows == 0 {
            return Err(invalid);
        }

        let count = u64::from(self.columns) * u64::from(self.rows);
        if count > u64::from(u32::MAX) {
            return Err(invalid);
        }
        usize::try_from(count).map_err(|_| invalid)
    }
}

#[derive(Clone, Debug)]
struct Square {
    cell: CellCoord,
    kind: CellKind,
    occupants: Vec<UnitId>,
}

#[derive(Clone, Debug)]
struct Unit {
    kind: UnitKind,
    facing: Direction,
    square: Option<SquareId>,
}

/// Fixed-size grid of squares together with the units placed on it.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    squares: Vec<Square>,
    units: Vec<Unit>,
}

impl Board {
    /// Creates a board whose squares are all open floor.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        let count = config.cell_count()?;
        Self::from_cells(config, vec![CellKind::Floor; count])
    }

    /// Creates a board from row-major cell kinds.
    ///
    /// The number of cells must match the configured dimensions exactly.
    pub fn from_cells(config: BoardConfig, cells: Vec<CellKind>) -> Result<Self, BoardError> {
        let count = config.cell_count()?;
        if cells.len() != count {
            return Err(BoardError::InvalidDimensions {
                columns: config.columns,
                rows: config.rows,
            });
        }

        let squares = cells
            .into_iter()
            .enumerate()
            .map(|(index, kind)| {
                let index = index as u32;
                Square {
                    cell: CellCoord::new(index % config.columns, index / config.columns),
                    kind,
                    occupants: Vec::new(),
                }
            })
            .collect();

        Ok(Self {
            config,
            squares,
            units: Vec::new(),
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.config.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.config.rows
    }

    /// Iterator over every square in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = SquareId> + '_ {
        let count = self.squares.len() as u32;
        (0..count).map(SquareId::new)
    }

    /// Iterator over every unit in creation order, placed or not.
    pub fn units(&self) -> impl Iterator<Item = UnitId> + '_ {
        (0..self.units.len()).map(|index| UnitId::new(index as u32))
    }

    /// Resolves the square at the provided coordinate.
    pub fn square_at(&self, cell: CellCoord) -> Result<SquareId, BoardError> {
        self.index(cell)
            .map(|index| SquareId::new(index as u32))
            .ok_or(BoardError::OutOfBounds {
                cell,
                columns: self.columns(),
                rows: self.rows(),
            })
    }

    /// Coordinate of the square.
    pub fn cell_of(&self, square: SquareId) -> Result<CellCoord, BoardError> {
        self.square(square).map(|state| state.cell)
    }

    /// Terrain of the square.
    pub fn cell_kind(&self, square: SquareId) -> Result<CellKind, BoardError> {
        self.square(square).map(|state| state.kind)
    }

    /// Reports whether moving units may path through the square.
    ///
    /// Squares from another board are never traversable.
    #[must_use]
    pub fn is_traversable(&self, square: SquareId) -> bool {
        self.square(square)
            .map_or(false, |state| state.kind.is_traversable())
    }

    /// Adjacent square in the provided direction.
    ///
    /// Returns `None` past the board edge unless the board wraps.
    #[must_use]
    pub fn neighbor(&self, square: SquareId, direction: Direction) -> Option<SquareId> {
        self.offset_square(square, direction.delta())
    }

    /// Square displaced from `square` by an arbitrary offset.
    ///
    /// Returns `None` when the displacement leaves a non-wrapping board.
    #[must_use]
    pub fn offset_square(&self, square: SquareId, offset: CellOffset) -> Option<SquareId> {
        let origin = self.square(square).ok()?.cell;
        let (columns, rows) = (self.columns(), self.rows());
        let cell = if self.config.wraps() {
            origin.offset_wrapping(offset, columns, rows)?
        } else {
            origin.offset_within(offset, columns, rows)?
        };
        self.square_at(cell).ok()
    }

    /// Creates a new unit that is not yet placed on any square.
    ///
    /// The unit faces [`Direction::East`] until turned.
    pub fn add_unit(&mut self, kind: UnitKind) -> UnitId {
        let id = UnitId::new(self.units.len() as u32);
        self.units.push(Unit {
            kind,
            facing: Direction::default(),
            square: None,
        });
        trace!("created {kind:?} unit {}", id.get());
        id
    }

    /// Category of the unit.
    pub fn unit_kind(&self, unit: UnitId) -> Result<UnitKind, BoardError> {
        self.unit(unit).map(|state| state.kind)
    }

    /// Direction the unit currently faces.
    pub fn facing(&self, unit: UnitId) -> Result<Direction, BoardError> {
        self.unit(unit).map(|state| state.facing)
    }

    /// Turns the unit to face the provided direction.
    pub fn set_facing(&mut self, unit: UnitId, direction: Direction) -> Result<(), BoardError> {
        self.unit_mut(unit)?.facing = direction;
        Ok(())
    }

    /// Places the unit on the square, leaving its previous square first.
    ///
    /// Occupying the square the unit already stands on changes nothing.
    /// There is no occupancy limit; collision rules belong to the caller.
    pub fn occupy(&mut self, square: SquareId, unit: UnitId) -> Result<(), BoardError> {
        let _ = self.square(square)?;
        let previous = self.unit(unit)?.square;
        if previous == Some(square) {
            return Ok(());
        }

        if let Some(previous) = previous {
            self.detach(previous, unit);
        }
        self.squares[square.get() as usize].occupants.push(unit);
        self.units[unit.get() as usize].square = Some(square);
        trace!(
            "unit {} moved from {:?} to square {}",
            unit.get(),
            previous.map(|id| id.get()),
            square.get()
        );
        debug_assert!(self.is_consistent(unit));
        Ok(())
    }

    /// Removes the unit from the square.
    ///
    /// Does nothing when the unit does not stand on that square.
    pub fn leave(&mut self, square: SquareId, unit: UnitId) -> Result<(), BoardError> {
        let _ = self.square(square)?;
        if self.unit(unit)?.square != Some(square) {
            return Ok(());
        }

        self.detach(square, unit);
        self.units[unit.get() as usize].square = None;
        trace!("unit {} left square {}", unit.get(), square.get());
        debug_assert!(self.is_consistent(unit));
        Ok(())
    }

    /// Removes the unit from whichever square it stands on.
    pub fn lift(&mut self, unit: UnitId) -> Result<(), BoardError> {
        match self.unit(unit)?.square {
            Some(square) => self.leave(square, unit),
            None => Ok(()),
        }
    }

    /// Units standing on the square in arrival order; the last one is on top.
    ///
    /// Squares from another board have no occupants.
    #[must_use]
    pub fn occupants(&self, square: SquareId) -> &[UnitId] {
        self.square(square)
            .map(|state| state.occupants.as_slice())
            .unwrap_or(&[])
    }

    /// Reports whether the unit is placed on a square.
    #[must_use]
    pub fn has_square(&self, unit: UnitId) -> bool {
        self.placement(unit).is_some()
    }

    /// Square the unit stands on.
    ///
    /// Fails with [`BoardError::UnitNotPlaced`] for an unplaced unit; callers
    /// check [`Board::has_square`] first.
    pub fn square_of(&self, unit: UnitId) -> Result<SquareId, BoardError> {
        self.unit(unit)?
            .square
            .ok_or(BoardError::UnitNotPlaced(unit))
    }

    /// Square the unit stands on, or `None` when unplaced or unknown.
    #[must_use]
    pub fn placement(&self, unit: UnitId) -> Option<SquareId> {
        self.unit(unit).ok().and_then(|state| state.square)
    }

    /// Walks `steps` squares from the unit in the direction it faces.
    ///
    /// Yields the unit's own square for zero steps and `Ok(None)` once the
    /// walk runs off the board. Walls along the way are not consulted.
    pub fn squares_ahead_of(
        &self,
        unit: UnitId,
        steps: u32,
    ) -> Result<Option<SquareId>, BoardError> {
        let facing = self.facing(unit)?;
        let mut square = self.square_of(unit)?;
        for _ in 0..steps {
            match self.neighbor(square, facing) {
                Some(next) => square = next,
                None => return Ok(None),
            }
        }
        Ok(Some(square))
    }

    fn detach(&mut self, square: SquareId, unit: UnitId) {
        if let Some(state) = self.squares.get_mut(square.get() as usize) {
            state.occupants.retain(|occupant| *occupant != unit);
        }
    }

    fn is_consistent(&self, unit: UnitId) -> bool {
        let listed: Vec<SquareId> = self
            .squares()
            .filter(|square| self.occupants(*square).contains(&unit))
            .collect();
        match self.placement(unit) {
            Some(square) => {
                let copies = self
                    .occupants(square)
                    .iter()
                    .filter(|occupant| **occupant == unit)
                    .count();
                listed == [square] && copies == 1
            }
            None => listed.is_empty(),
        }
    }

    fn square(&self, square: SquareId) -> Result<&Square, BoardError> {
        self.squares
            .get(square.get() as usize)
            .ok_or(BoardError::UnknownSquare(square))
    }

    fn unit(&self, unit: UnitId) -> Result<&Unit, BoardError> {
        self.units
            .get(unit.get() as usize)
            .ok_or(BoardError::UnknownUnit(unit))
    }

    fn unit_mut(&mut self, unit: UnitId) -> Result<&mut Unit, BoardError> {
        self.units
            .get_mut(unit.get() as usize)
            .ok_or(BoardError::UnknownUnit(unit))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns() && cell.row() < self.rows() {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Query functions that provide read-only snapshots of the board.
pub mod query {
    use maze_chase_core::{CellCoord, Direction, UnitId, UnitKind};

    use super::Board;

    /// Captures every placed unit of the board in creation order.
    #[must_use]
    pub fn unit_view(board: &Board) -> UnitView {
        let snapshots = board
            .units()
            .filter_map(|id| {
                let square = board.placement(id)?;
                Some(UnitSnapshot {
                    id,
                    kind: board.unit_kind(id).ok()?,
                    facing: board.facing(id).ok()?,
                    cell: board.cell_of(square).ok()?,
                })
            })
            .collect();
        UnitView { snapshots }
    }

    /// Read-only snapshot describing the placed units.
    #[derive(Clone, Debug, Default)]
    pub struct UnitView {
        snapshots: Vec<UnitSnapshot>,
    }

    impl UnitView {
        /// Iterator over the captured snapshots in creation order.
        pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
            self.snapshots.iter()
        }
    }

    /// Immutable representation of a single placed unit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct UnitSnapshot {
        /// Handle of the unit.
        pub id: UnitId,
        /// Category of the unit.
        pub kind: UnitKind,
        /// Direction the unit faces.
        pub facing: Direction,
        /// Cell the unit occupies.
        pub cell: CellCoord,
    }
}
