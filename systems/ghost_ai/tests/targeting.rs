use maze_chase_board::{Board, BoardConfig};
use maze_chase_core::{CellCoord, CellKind, Direction, GhostKind, SquareId, UnitId, UnitKind};
use maze_chase_ghost_ai::{ClydeStrategy, Ghost, InkyStrategy, TargetStrategy, TargetingConfig};

struct Scene {
    board: Board,
    ghosts: Vec<Ghost>,
    player: Option<UnitId>,
}

/// Builds a board from rows where `P` is the player and `B`, `Y`, `I`, `C`
/// are Blinky, Pinky, Inky and Clyde.
fn scene(rows: &[&str]) -> Scene {
    configured_scene(rows, TargetingConfig::default())
}

fn configured_scene(rows: &[&str], config: TargetingConfig) -> Scene {
    let columns = rows[0].len() as u32;
    let cells = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|symbol| match symbol {
            '#' => CellKind::Wall,
            _ => CellKind::Floor,
        })
        .collect();
    let dimensions = BoardConfig::new(columns, rows.len() as u32);
    let mut board = Board::from_cells(dimensions, cells).expect("valid cells");
    let mut ghosts = Vec::new();
    let mut player = None;

    for (row, line) in rows.iter().enumerate() {
        for (column, symbol) in line.chars().enumerate() {
            let kind = match symbol {
                'P' => UnitKind::Player,
                'B' => UnitKind::Ghost(GhostKind::Blinky),
                'Y' => UnitKind::Ghost(GhostKind::Pinky),
                'I' => UnitKind::Ghost(GhostKind::Inky),
                'C' => UnitKind::Ghost(GhostKind::Clyde),
                _ => continue,
            };
            let unit = board.add_unit(kind);
            let square = board
                .square_at(CellCoord::new(column as u32, row as u32))
                .expect("in bounds");
            board.occupy(square, unit).expect("known handles");
            match kind.ghost() {
                Some(ghost) => ghosts.push(Ghost::of_kind(unit, ghost, config)),
                None => player = Some(unit),
            }
        }
    }

    Scene {
        board,
        ghosts,
        player,
    }
}

impl Scene {
    fn ghost(&self, kind: GhostKind) -> &Ghost {
        self.ghosts
            .iter()
            .find(|ghost| ghost.kind() == kind)
            .expect("ghost present in scene")
    }

    fn player(&self) -> UnitId {
        self.player.expect("player present in scene")
    }

    fn face_player(&mut self, direction: Direction) {
        let player = self.player();
        self.board
            .set_facing(player, direction)
            .expect("known handle");
    }

    fn target_cell(&self, kind: GhostKind) -> Option<CellCoord> {
        self.ghost(kind)
            .target(&self.board)
            .and_then(|square| self.board.cell_of(square).ok())
    }

    fn next_move(&self, kind: GhostKind) -> Option<Direction> {
        self.ghost(kind).next_ai_move(&self.board)
    }
}

fn cell(column: u32, row: u32) -> Option<CellCoord> {
    Some(CellCoord::new(column, row))
}

#[test]
fn blinky_chases_player_square() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scene = scene(&["#######", "#P   B#", "#######"]);
    assert_eq!(scene.target_cell(GhostKind::Blinky), cell(1, 1));
    assert_eq!(scene.next_move(GhostKind::Blinky), Some(Direction::West));
}

#[test]
fn blinky_idles_without_player() {
    let scene = scene(&["#####", "#  B#", "#####"]);
    assert_eq!(scene.next_move(GhostKind::Blinky), None);
}

#[test]
fn pinky_ambushes_four_ahead() {
    let mut scene = scene(&["##########", "#P       #", "#       Y#", "##########"]);
    scene.face_player(Direction::East);
    assert_eq!(scene.target_cell(GhostKind::Pinky), cell(5, 1));
    assert_eq!(scene.next_move(GhostKind::Pinky), Some(Direction::North));
}

#[test]
fn pinky_falls_back_to_player_when_lookahead_hits_wall() {
    let scene = scene(&["######", "#P  Y#", "######"]);
    assert_eq!(scene.target_cell(GhostKind::Pinky), cell(1, 1));
}

#[test]
fn pinky_north_quirk_shifts_target_west() {
    let rows = [
        "#########",
        "#       #",
        "#       #",
        "#       #",
        "#       #",
        "#    P  #",
        "#Y      #",
        "#########",
    ];

    let mut quirky = scene(&rows);
    quirky.face_player(Direction::North);
    assert_eq!(quirky.target_cell(GhostKind::Pinky), cell(1, 1));

    let mut faithful = configured_scene(&rows, TargetingConfig::new(false, 8));
    faithful.face_player(Direction::North);
    assert_eq!(faithful.target_cell(GhostKind::Pinky), cell(5, 1));
}

#[test]
fn clyde_chases_from_afar() {
    let scene = scene(&["#############", "#P         C#", "#############"]);
    assert_eq!(scene.target_cell(GhostKind::Clyde), cell(1, 1));
    assert_eq!(scene.next_move(GhostKind::Clyde), Some(Direction::West));
}

#[test]
fn clyde_retreats_to_corner_when_close() {
    let scene = scene(&["#######", "#    P#", "#   C #", "#     #", "#######"]);
    assert_eq!(scene.target_cell(GhostKind::Clyde), cell(1, 3));
    let corner = ClydeStrategy::scatter_corner(&scene.board)
        .and_then(|square| scene.board.cell_of(square).ok());
    assert_eq!(corner, cell(1, 3));
    assert_eq!(scene.next_move(GhostKind::Clyde), Some(Direction::South));
}

#[test]
fn clyde_shyness_is_configurable() {
    let rows = ["#######", "#    P#", "#   C #", "#     #", "#######"];
    let scene = configured_scene(&rows, TargetingConfig::new(true, 1));
    assert_eq!(scene.target_cell(GhostKind::Clyde), cell(5, 1));
}

#[test]
fn inky_strategy_needs_blinky() {
    let scene = scene(&["#######", "#P   I#", "#######"]);
    let inky = scene.ghost(GhostKind::Inky).unit();
    let strategy = InkyStrategy::new(TargetingConfig::default());
    assert_eq!(strategy.target(&scene.board, inky), None);
}

#[test]
fn unplaced_ghost_idles() {
    let mut scene = scene(&["#######", "#P   B#", "#######"]);
    let blinky = scene.ghost(GhostKind::Blinky).unit();
    scene.board.lift(blinky).expect("known handle");
    assert_eq!(scene.next_move(GhostKind::Blinky), None);
}

#[derive(Debug)]
struct FixedTarget(CellCoord);

impl TargetStrategy for FixedTarget {
    fn target(&self, board: &Board, _ghost: UnitId) -> Option<SquareId> {
        board.square_at(self.0).ok()
    }
}

#[test]
fn injected_strategy_drives_the_move() {
    let scene = scene(&["#####", "#   #", "# B #", "#####"]);
    let blinky = scene.ghost(GhostKind::Blinky).unit();
    let toward = Box::new(FixedTarget(CellCoord::new(3, 1)));
    let ghost = Ghost::new(blinky, GhostKind::Blinky, toward);
    assert_eq!(ghost.next_ai_move(&scene.board), Some(Direction::North));

    let underfoot = Box::new(FixedTarget(CellCoord::new(2, 2)));
    let on_target = Ghost::new(blinky, GhostKind::Blinky, underfoot);
    assert_eq!(on_target.next_ai_move(&scene.board), None);
}
