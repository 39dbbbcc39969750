#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless breadth-first navigation over a Maze Chase board.
//!
//! Every search expands neighbours in [`Direction::ALL`] order (north, east,
//! south, west), so equally short routes are always resolved the same way by
//! [`find_nearest_unit`] and [`shortest_path`]. Walls act as search barriers;
//! the square a search starts from is expanded regardless of its terrain.
//! None of the functions mutate the board.

use std::collections::VecDeque;

use maze_chase_board::Board;
use maze_chase_core::{Direction, SquareId, UnitId, UnitKind};

/// Finds the closest unit accepted by `predicate`, measured in steps from
/// `origin` through traversable squares.
///
/// Units sharing a square are inspected in arrival order. Returns `None` when
/// no reachable unit matches.
#[must_use]
pub fn find_nearest_unit<F>(board: &Board, origin: SquareId, mut predicate: F) -> Option<UnitId>
where
    F: FnMut(UnitId, UnitKind) -> bool,
{
    let mut search = Search::new(board, origin)?;
    while let Some(square) = search.queue.pop_front() {
        let found = board.occupants(square).iter().copied().find(|unit| {
            board
                .unit_kind(*unit)
                .map_or(false, |kind| predicate(*unit, kind))
        });
        if found.is_some() {
            return found;
        }

        for direction in Direction::ALL {
            let Some(next) = board.neighbor(square, direction) else {
                continue;
            };
            if board.is_traversable(next) {
                let _ = search.discover(next, square, direction);
            }
        }
    }
    None
}

/// Computes the directions of a shortest route from `origin` to `destination`.
///
/// Both endpoints are accepted whatever their terrain; every square in between
/// must be traversable. Among equally short routes the one discovered first
/// under north, east, south, west expansion wins. Returns an empty route when
/// the endpoints coincide and `None` when the destination is unreachable.
#[must_use]
pub fn shortest_path(
    board: &Board,
    origin: SquareId,
    destination: SquareId,
) -> Option<Vec<Direction>> {
    let mut search = Search::new(board, origin)?;
    if origin == destination {
        return Some(Vec::new());
    }
    let _ = search.index(destination)?;

    while let Some(square) = search.queue.pop_front() {
        for direction in Direction::ALL {
            let Some(next) = board.neighbor(square, direction) else {
                continue;
            };
            if next != destination && !board.is_traversable(next) {
                continue;
            }
            if search.discover(next, square, direction) && next == destination {
                return Some(search.route_to(destination));
            }
        }
    }
    None
}

/// First step of a shortest route from `origin` to `destination`.
///
/// Returns `None` when there is no route or the endpoints coincide.
#[must_use]
pub fn direction_to_target(
    board: &Board,
    origin: SquareId,
    destination: SquareId,
) -> Option<Direction> {
    shortest_path(board, origin, destination)?.first().copied()
}

/// Number of steps on a shortest route, or `None` when unreachable.
#[must_use]
pub fn path_length(board: &Board, origin: SquareId, destination: SquareId) -> Option<usize> {
    let route = shortest_path(board, origin, destination)?;
    Some(route.len())
}

/// Closest traversable square to `origin`, walking straight through walls.
///
/// Returns `origin` itself when it is traversable and `None` only for a board
/// without any open floor.
#[must_use]
pub fn nearest_traversable(board: &Board, origin: SquareId) -> Option<SquareId> {
    let mut search = Search::new(board, origin)?;
    while let Some(square) = search.queue.pop_front() {
        if board.is_traversable(square) {
            return Some(square);
        }

        for direction in Direction::ALL {
            if let Some(next) = board.neighbor(square, direction) {
                let _ = search.discover(next, square, direction);
            }
        }
    }
    None
}

/// Breadth-first frontier with parent links for route reconstruction.
struct Search {
    visited: Vec<Option<Parent>>,
    queue: VecDeque<SquareId>,
}

#[derive(Clone, Copy, Debug)]
enum Parent {
    Origin,
    Step { from: SquareId, direction: Direction },
}

impl Search {
    fn new(board: &Board, origin: SquareId) -> Option<Self> {
        let count = board.squares().count();
        let mut search = Self {
            visited: vec![None; count],
            queue: VecDeque::new(),
        };
        let index = search.index(origin)?;
        search.visited[index] = Some(Parent::Origin);
        search.queue.push_back(origin);
        Some(search)
    }

    /// Records `square` as reached from `from`; returns `false` if it was
    /// already known.
    fn discover(&mut self, square: SquareId, from: SquareId, direction: Direction) -> bool {
        let Some(index) = self.index(square) else {
            return false;
        };
        if self.visited[index].is_some() {
            return false;
        }

        self.visited[index] = Some(Parent::Step { from, direction });
        self.queue.push_back(square);
        true
    }

    fn route_to(&self, destination: SquareId) -> Vec<Direction> {
        let mut route = Vec::new();
        let mut current = destination;
        while let Some(Parent::Step { from, direction }) = self.parent(current) {
            route.push(direction);
            current = from;
        }
        route.reverse();
        route
    }

    fn parent(&self, square: SquareId) -> Option<Parent> {
        let index = self.index(square)?;
        self.visited[index]
    }

    fn index(&self, square: SquareId) -> Option<usize> {
        let index = usize::try_from(square.get()).ok()?;
        (index < self.visited.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_board::BoardConfig;
    use maze_chase_core::{CellCoord, CellKind};

    fn board_from_rows(rows: &[&str]) -> Board {
        let columns = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|symbol| match symbol {
                '#' => CellKind::Wall,
                _ => CellKind::Floor,
            })
            .collect();
        let config = BoardConfig::new(columns, rows.len() as u32);
        Board::from_cells(config, cells).expect("valid cells")
    }

    fn at(board: &Board, column: u32, row: u32) -> SquareId {
        board
            .square_at(CellCoord::new(column, row))
            .expect("in bounds")
    }

    #[test]
    fn route_reconstruction_follows_parents() {
        let board = board_from_rows(&["   ", "   "]);
        let origin = at(&board, 0, 0);
        let mut search = Search::new(&board, origin).expect("known square");
        let east = at(&board, 1, 0);
        let south_east = at(&board, 1, 1);
        assert!(search.discover(east, origin, Direction::East));
        assert!(search.discover(south_east, east, Direction::South));
        assert!(!search.discover(east, south_east, Direction::North));

        assert_eq!(
            search.route_to(south_east),
            vec![Direction::East, Direction::South]
        );
        assert!(search.route_to(origin).is_empty());
    }

    #[test]
    fn unknown_origin_finds_nothing() {
        let board = board_from_rows(&["  "]);
        let foreign = SquareId::new(17);
        assert_eq!(shortest_path(&board, foreign, at(&board, 0, 0)), None);
        assert_eq!(nearest_traversable(&board, foreign), None);
        assert_eq!(find_nearest_unit(&board, foreign, |_, _| true), None);
    }

    #[test]
    fn unknown_destination_is_unreachable() {
        let board = board_from_rows(&["  "]);
        assert_eq!(
            shortest_path(&board, at(&board, 0, 0), SquareId::new(17)),
            None
        );
    }

    #[test]
    fn nearest_traversable_prefers_north_then_east() {
        let board = board_from_rows(&["# #", "###", "  #"]);
        let center = at(&board, 1, 1);
        assert_eq!(nearest_traversable(&board, center), Some(at(&board, 1, 0)));
    }
}
