//! Chaos Drop game logic
//!
//! Falling-block play with the scoring turned upside down: every lock is
//! worth more the rougher and more hole-riddled the stack becomes, and
//! clearing rows costs points. The run ends when a freshly spawned piece
//! has nowhere to go.

use crate::collision::can_place;
use crate::grid::Grid;
use crate::piece::Piece;
use crate::randomizer::Randomizer;
use crate::run::{Action, ArcadeGame, RunClock, RunExtras, RunStatus, Snapshot, Ticker};
use crate::score::{BoardAnalysis, ChaosScore, analyze};
use crate::tetromino::{PieceKind, RotationDirection};
use std::time::Duration;
use tracing::{debug, info};

/// Standard Chaos Drop board dimensions
pub const CHAOS_WIDTH: usize = 10;
pub const CHAOS_HEIGHT: usize = 18;

#[derive(Debug, Clone)]
pub struct ChaosConfig {
    pub width: usize,
    pub height: usize,
    pub drop_interval: Duration,
    pub soft_drop_interval: Duration,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            width: CHAOS_WIDTH,
            height: CHAOS_HEIGHT,
            drop_interval: Duration::from_millis(700),
            soft_drop_interval: Duration::from_millis(70),
        }
    }
}

/// What happened on the most recent lock, for on-screen feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared_rows: usize,
    pub chaos_score: u32,
    /// Signed change of the running score
    pub delta: i64,
}

/// Chaos Drop game state
#[derive(Debug, Clone)]
pub struct ChaosGame {
    config: ChaosConfig,
    randomizer: Randomizer,
    board: Grid<PieceKind>,
    current: Option<Piece>,
    next: Piece,
    status: RunStatus,
    clock: RunClock,
    gravity: Ticker,
    soft_dropping: bool,
    score: ChaosScore,
    analysis: BoardAnalysis,
    last_lock: Option<LockOutcome>,
    snapshot: Option<Snapshot>,
}

impl ChaosGame {
    pub fn new(config: ChaosConfig) -> Self {
        Self::with_randomizer(config, Randomizer::new())
    }

    #[cfg(test)]
    pub fn with_seed(config: ChaosConfig, seed: u64) -> Self {
        Self::with_randomizer(config, Randomizer::with_seed(seed))
    }

    fn with_randomizer(config: ChaosConfig, mut randomizer: Randomizer) -> Self {
        let board = Grid::new(config.width, config.height);
        let next = randomizer.next_piece(config.width);
        let analysis = analyze(&board);
        Self {
            gravity: Ticker::new(config.drop_interval),
            config,
            randomizer,
            board,
            current: None,
            next,
            status: RunStatus::Idle,
            clock: RunClock::new(),
            soft_dropping: false,
            score: ChaosScore::new(),
            analysis,
            last_lock: None,
            snapshot: None,
        }
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    pub fn board(&self) -> &Grid<PieceKind> {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn chaos_score(&self) -> &ChaosScore {
        &self.score
    }

    /// Analysis of the board as of the last lock
    pub fn analysis(&self) -> &BoardAnalysis {
        &self.analysis
    }

    pub fn last_lock(&self) -> Option<LockOutcome> {
        self.last_lock
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Landing position of the current piece
    pub fn ghost(&self) -> Option<Piece> {
        self.current.as_ref().map(|piece| piece.ghost(&self.board))
    }

    /// Settled board with the falling piece drawn in
    #[cfg(test)]
    pub fn composited(&self) -> Grid<PieceKind> {
        match &self.current {
            Some(piece) => self.board.merged(piece.block_positions(), piece.kind),
            None => self.board.clone(),
        }
    }

    /// Shift the falling piece by (dx, dy)
    ///
    /// A blocked downward move locks the piece instead.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = &self.current else {
            return false;
        };
        if can_place(&self.board, piece, dx, dy) {
            self.current = Some(piece.shifted(dx, dy));
            return true;
        }
        if dy > 0 {
            self.lock();
        }
        false
    }

    /// Rotate the falling piece, keeping it where it is if the result is illegal
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        let Some(piece) = &self.current else {
            return false;
        };
        match piece.rotated(direction, &self.board) {
            Some(rotated) => {
                self.current = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Drop the falling piece as far as it goes and lock it
    pub fn hard_drop(&mut self) {
        let Some(piece) = &self.current else {
            return;
        };
        let distance = piece.drop_distance(&self.board);
        self.current = Some(piece.shifted(0, distance));
        self.lock();
    }

    /// Switch between normal and accelerated gravity
    pub fn set_soft_drop(&mut self, enabled: bool) {
        if self.soft_dropping == enabled {
            return;
        }
        self.soft_dropping = enabled;
        let interval = if enabled {
            self.config.soft_drop_interval
        } else {
            self.config.drop_interval
        };
        self.gravity.set_interval(interval);
        self.gravity.reset();
    }

    /// Merge the falling piece, clear rows, score the result and spawn
    fn lock(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        let merged = self.board.merged(piece.block_positions(), piece.kind);
        let (board, cleared_rows) = merged.clear_full_rows();
        let analysis = analyze(&board);
        let delta = self.score.add_lock(&analysis, cleared_rows);
        debug!(
            kind = ?piece.kind,
            cleared_rows,
            chaos = analysis.chaos_score,
            holes = analysis.holes,
            delta,
            "piece locked"
        );
        self.last_lock = Some(LockOutcome {
            cleared_rows,
            chaos_score: analysis.chaos_score,
            delta,
        });
        self.board = board;
        self.analysis = analysis;
        self.spawn();
    }

    /// Promote the preview piece, ending the run if it cannot be placed
    fn spawn(&mut self) {
        let width = self.config.width;
        let candidate = std::mem::replace(&mut self.next, self.randomizer.next_piece(width));
        if !can_place(&self.board, &candidate, 0, 0) {
            self.current = None;
            self.end_run();
            return;
        }
        self.current = Some(candidate);
    }

    fn end_run(&mut self) {
        self.status = RunStatus::Over;
        self.soft_dropping = false;
        self.snapshot = Some(Snapshot {
            score: self.score.points,
            elapsed_secs: self.clock.seconds(),
            extras: RunExtras::Chaos {
                placements: self.score.placements,
                holes: self.analysis.holes,
                lines_cleared: self.score.lines_cleared,
            },
        });
        info!(
            score = self.score.points,
            placements = self.score.placements,
            elapsed = self.clock.seconds(),
            "chaos run over"
        );
    }
}

impl ArcadeGame for ChaosGame {
    fn start(&mut self) {
        self.board = Grid::new(self.config.width, self.config.height);
        self.analysis = analyze(&self.board);
        self.score = ChaosScore::new();
        self.clock = RunClock::new();
        self.gravity = Ticker::new(self.config.drop_interval);
        self.soft_dropping = false;
        self.last_lock = None;
        self.snapshot = None;
        self.current = None;
        self.next = self.randomizer.next_piece(self.config.width);
        self.status = RunStatus::Running;
        self.spawn();
        info!("chaos run started");
    }

    fn update(&mut self, dt: Duration) {
        if self.status != RunStatus::Running {
            return;
        }
        self.clock.advance(dt);
        self.gravity.advance(dt);
        while self.status == RunStatus::Running && self.gravity.fire() {
            self.move_piece(0, 1);
        }
    }

    fn apply(&mut self, action: Action) {
        match self.status {
            RunStatus::Over => {
                if action == Action::Restart {
                    self.start();
                }
                return;
            }
            RunStatus::Idle => {
                if matches!(action, Action::DownReleased | Action::Quit) {
                    return;
                }
                self.start();
            }
            RunStatus::Running => {}
        }

        match action {
            Action::Left => {
                self.move_piece(-1, 0);
            }
            Action::Right => {
                self.move_piece(1, 0);
            }
            Action::Down => self.set_soft_drop(true),
            Action::DownReleased => self.set_soft_drop(false),
            Action::Up | Action::RotateCw => {
                self.rotate(RotationDirection::Clockwise);
            }
            Action::RotateCcw => {
                self.rotate(RotationDirection::CounterClockwise);
            }
            Action::HardDrop => self.hard_drop(),
            Action::Restart | Action::Quit => {}
        }
    }

    fn status(&self) -> RunStatus {
        self.status
    }

    fn score(&self) -> u64 {
        self.score.points
    }

    fn elapsed_secs(&self) -> u64 {
        self.clock.seconds()
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    const GRAVITY: Duration = Duration::from_millis(700);

    fn running(seed: u64) -> ChaosGame {
        let mut game = ChaosGame::with_seed(ChaosConfig::default(), seed);
        game.start();
        game
    }

    #[test]
    fn test_idle_until_started() {
        let mut game = ChaosGame::with_seed(ChaosConfig::default(), 1);
        assert_eq!(game.status(), RunStatus::Idle);
        assert!(game.current().is_none());
        game.update(Duration::from_secs(3));
        assert_eq!(game.elapsed_secs(), 0);
        assert_eq!(game.board().filled_count(), 0);
    }

    #[test]
    fn test_first_key_starts_run() {
        let mut game = ChaosGame::with_seed(ChaosConfig::default(), 1);
        game.apply(Action::Left);
        assert_eq!(game.status(), RunStatus::Running);
        assert!(game.current().is_some());
    }

    #[test]
    fn test_o_piece_lock_on_empty_board() {
        let mut game = running(2);
        game.current = Some(Piece::new(PieceKind::O, 0, CHAOS_WIDTH));

        game.hard_drop();

        let board = game.board();
        assert_eq!(board.filled_count(), 4);
        for (x, y) in [(4, 16), (5, 16), (4, 17), (5, 17)] {
            assert_eq!(board.get(x, y), Some(Cell::Filled(PieceKind::O)));
        }
        // Heights 2,2 give total 4 and bumpiness 4, so round(8 / 2) = 4
        assert_eq!(game.analysis().chaos_score, 4);
        assert_eq!(game.chaos_score().points, 4);
        assert_eq!(game.chaos_score().placements, 1);
        assert_eq!(game.chaos_score().lines_cleared, 0);
        assert_eq!(
            game.last_lock(),
            Some(LockOutcome {
                cleared_rows: 0,
                chaos_score: 4,
                delta: 4
            })
        );
        assert!(game.current().is_some());
    }

    #[test]
    fn test_gravity_moves_and_locks() {
        let mut game = running(3);
        game.current = Some(Piece::new(PieceKind::O, 0, CHAOS_WIDTH));

        game.update(GRAVITY);
        assert_eq!(game.current().map(|p| p.y), Some(1));

        // 15 more steps reach the floor, the next one locks
        game.update(GRAVITY * 15);
        assert_eq!(game.current().map(|p| p.y), Some(16));
        game.update(GRAVITY);
        assert_eq!(game.chaos_score().placements, 1);
        assert_eq!(game.board().filled_count(), 4);
    }

    #[test]
    fn test_soft_drop_speeds_gravity() {
        let mut game = running(4);
        game.current = Some(Piece::new(PieceKind::O, 0, CHAOS_WIDTH));
        game.apply(Action::Down);
        assert!(game.is_soft_dropping());
        game.update(Duration::from_millis(140));
        assert_eq!(game.current().map(|p| p.y), Some(2));

        game.apply(Action::DownReleased);
        game.update(Duration::from_millis(140));
        assert_eq!(game.current().map(|p| p.y), Some(2));
    }

    #[test]
    fn test_cleared_row_costs_points() {
        let mut game = running(5);
        for x in 0..8 {
            game.board.set(x, 17, Cell::Filled(PieceKind::Z));
        }
        game.score.points = 10;
        // An O against the right wall completes the bottom row
        let mut piece = Piece::new(PieceKind::O, 0, CHAOS_WIDTH);
        piece.x = 8;
        game.current = Some(piece);

        game.hard_drop();

        assert_eq!(game.chaos_score().lines_cleared, 1);
        // Row 17 cleared; the upper half of the O sinks to the floor
        assert_eq!(game.board().filled_count(), 2);
        assert_eq!(game.board().get(8, 17), Some(Cell::Filled(PieceKind::O)));
        // Heights ...0,1,1: total 2, bumpiness 1, chaos 2, minus 2 for the row
        assert_eq!(game.chaos_score().points, 10);
    }

    #[test]
    fn test_blocked_spawn_ends_run() {
        let mut game = running(6);
        // Leave the two left columns open so the lock clears nothing
        for y in 0..CHAOS_HEIGHT as i32 {
            for x in 2..CHAOS_WIDTH as i32 {
                game.board.set(x, y, Cell::Filled(PieceKind::J));
            }
        }
        let mut piece = Piece::new(PieceKind::I, 1, CHAOS_WIDTH);
        piece.x = 0;
        piece.y = -4;
        game.current = Some(piece);

        game.hard_drop();

        assert_eq!(game.status(), RunStatus::Over);
        assert!(game.current().is_none());
        let snapshot = game.snapshot().unwrap();
        assert_eq!(snapshot.score, game.chaos_score().points);
        assert!(matches!(
            snapshot.extras,
            RunExtras::Chaos { placements: 1, .. }
        ));

        // Frozen until restarted
        let board = game.board().clone();
        game.apply(Action::HardDrop);
        game.update(Duration::from_secs(10));
        assert_eq!(game.board(), &board);
        assert_eq!(game.elapsed_secs(), 0);

        game.apply(Action::Restart);
        assert_eq!(game.status(), RunStatus::Running);
        assert_eq!(game.board().filled_count(), 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_walls_stop_horizontal_moves() {
        let mut game = running(7);
        game.current = Some(Piece::new(PieceKind::O, 0, CHAOS_WIDTH));
        for _ in 0..20 {
            game.apply(Action::Left);
        }
        assert_eq!(game.current().map(|p| p.x), Some(0));
        assert!(!game.move_piece(-1, 0));
        for _ in 0..20 {
            game.apply(Action::Right);
        }
        assert_eq!(game.current().map(|p| p.x), Some(8));
    }

    #[test]
    fn test_ghost_matches_hard_drop_landing() {
        let mut game = running(8);
        game.board.set(4, 10, Cell::Filled(PieceKind::S));
        game.current = Some(Piece::new(PieceKind::O, 0, CHAOS_WIDTH));
        let ghost = game.ghost().unwrap();
        assert_eq!(ghost.y, 8);
        game.hard_drop();
        assert_eq!(game.board().get(4, 9), Some(Cell::Filled(PieceKind::O)));
    }

    #[test]
    fn test_long_random_run_keeps_board_consistent() {
        let mut game = running(9);
        let moves = [
            Action::Left,
            Action::RotateCw,
            Action::Right,
            Action::Right,
            Action::RotateCcw,
            Action::HardDrop,
        ];
        for step in 0..3000 {
            game.apply(moves[step % moves.len()]);
            game.update(Duration::from_millis(100));
            if game.status() == RunStatus::Over {
                game.apply(Action::Restart);
            }
            if let Some(piece) = game.current() {
                assert!(can_place(game.board(), piece, 0, 0));
                assert!(piece.block_positions().iter().all(|b| {
                    b.x >= 0 && b.x < CHAOS_WIDTH as i32 && b.y < CHAOS_HEIGHT as i32
                }));
                let on_board = piece.block_positions().iter().filter(|b| b.y >= 0).count();
                assert_eq!(
                    game.composited().filled_count(),
                    game.board().filled_count() + on_board
                );
            }
        }
    }
}
