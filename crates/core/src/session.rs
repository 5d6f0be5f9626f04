//! Session module - the tick-driven game loop state
//!
//! The session ties together the grid, the falling piece, the lookahead and
//! held pieces, the spawner and the command queue. One [`Session::tick`] call
//! applies at most one queued command, then tries to move the piece down; if
//! it cannot, the piece is locked, the grid is resolved and the next piece
//! spawns.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::config::GameConfig;
use crate::grid::{Grid, ResolveReport};
use crate::piece::Piece;
use crate::rng::SimpleRng;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Creates pieces for one session.
///
/// Holds the grid dimensions and the RNG so that no piece needs shared
/// knowledge of the board size.
#[derive(Debug, Clone)]
pub struct PieceFactory {
    width: usize,
    height: usize,
    rng: SimpleRng,
}

impl PieceFactory {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: config.width(),
            height: config.height(),
            rng: SimpleRng::new(config.seed()),
        }
    }

    fn random_x(&mut self, size: usize) -> i32 {
        let max_x = self.width.saturating_sub(size) as u32;
        self.rng.next_inclusive(0, max_x) as i32
    }

    /// Spawn a random kind at a random column.
    pub fn spawn(&mut self) -> Piece {
        let kind = self.rng.choose(&ShapeKind::ALL).unwrap_or(ShapeKind::O);
        self.spawn_kind(kind)
    }

    /// Spawn a specific kind at a random column.
    pub fn spawn_kind(&mut self, kind: ShapeKind) -> Piece {
        let x = self.random_x(kind.matrix_size());
        Piece::spawn(kind, x, self.height, &mut self.rng)
    }

    /// Move an existing piece back to a random spawn column at the top.
    pub fn respawn(&mut self, piece: &mut Piece) {
        let x = self.random_x(piece.size());
        piece.respawn(x, self.height);
    }

    /// Derive a seed for a follow-up session.
    pub fn next_seed(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// Result of locking the current piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockReport {
    /// A tile landed above the grid.
    pub overflow: bool,
    pub resolve: ResolveReport,
    /// The next piece could not enter the grid.
    pub spawn_blocked: bool,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub action: Option<GameAction>,
    pub action_applied: bool,
    pub moved_down: bool,
    pub lock: Option<LockReport>,
    pub game_over: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    factory: PieceFactory,
    grid: Grid,
    current: Option<Piece>,
    next: Piece,
    held: Option<Piece>,
    can_hold: bool,
    queue: ArrayVec<GameAction, COMMAND_QUEUE_CAPACITY>,
    paused: bool,
    quit_requested: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    pieces_locked: u32,
    ticks: u64,
}

impl Session {
    /// Create a session with an empty grid and the first two pieces drawn.
    pub fn new(config: GameConfig) -> Self {
        let mut factory = PieceFactory::new(&config);
        let grid = Grid::new(&config);
        let current = factory.spawn();
        let next = factory.spawn();
        Self {
            config,
            factory,
            grid,
            current: Some(current),
            next,
            held: None,
            can_hold: true,
            queue: ArrayVec::new(),
            paused: false,
            quit_requested: false,
            episode_id: 0,
            pieces_locked: 0,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for setting up scenarios.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    /// Replace the falling piece (used to script scenarios).
    pub fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.grid.score()
    }

    pub fn game_over(&self) -> bool {
        self.grid.game_over()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.grid.outcome()
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Ticks since the episode started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Queue a command for a later tick. Returns false if the queue is full.
    pub fn enqueue(&mut self, action: GameAction) -> bool {
        self.queue.try_push(action).is_ok()
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        if let Some(action) = self.queue.pop_at(0) {
            report.action = Some(action);
            report.action_applied = self.apply_action(action);
        }

        if self.paused || self.quit_requested || self.grid.game_over() {
            report.game_over = self.grid.game_over();
            return report;
        }
        self.ticks = self.ticks.wrapping_add(1);

        let grid = &self.grid;
        let moved = match self.current.as_mut() {
            Some(piece) => piece.move_by(MoveDirection::Down, grid),
            None => return report,
        };

        if moved {
            report.moved_down = true;
        } else {
            report.lock = Some(self.lock_current());
        }
        report.game_over = self.grid.game_over();
        report
    }

    /// Apply a command immediately.
    ///
    /// Returns whether it had an effect. While paused only pause, restart and
    /// quit apply; after game over only restart and quit do.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if (self.paused || self.grid.game_over()) && !action.is_meta() {
            return false;
        }
        match action {
            GameAction::Quit => {
                self.quit_requested = true;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
            GameAction::Pause => {
                if self.grid.game_over() {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::MoveLeft => self.move_current(MoveDirection::Left),
            GameAction::MoveRight => self.move_current(MoveDirection::Right),
            GameAction::SoftDrop => self.move_current(MoveDirection::Down),
            GameAction::HardDrop => self.hard_drop() > 0,
            GameAction::RotateCw => self.rotate_current(RotateDirection::Clockwise),
            GameAction::RotateCcw => self.rotate_current(RotateDirection::CounterClockwise),
            GameAction::Hold => self.hold(),
        }
    }

    fn move_current(&mut self, dir: MoveDirection) -> bool {
        let grid = &self.grid;
        self.current
            .as_mut()
            .map_or(false, |piece| piece.move_by(dir, grid))
    }

    fn rotate_current(&mut self, dir: RotateDirection) -> bool {
        let grid = &self.grid;
        self.current
            .as_mut()
            .map_or(false, |piece| piece.rotate(dir, grid))
    }

    /// Soft drop until blocked. Returns rows travelled.
    ///
    /// The piece is not locked here; the gravity step of the tick does that.
    pub fn hard_drop(&mut self) -> u32 {
        let mut distance = 0;
        while self.move_current(MoveDirection::Down) {
            distance += 1;
        }
        distance
    }

    /// Swap the falling piece with the held one (once per locked piece).
    ///
    /// The first hold stores the current piece and brings in the lookahead.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(outgoing) = self.current.take() else {
            return false;
        };

        let incoming = match self.held.replace(outgoing) {
            Some(mut held) => {
                self.factory.respawn(&mut held);
                held
            }
            None => std::mem::replace(&mut self.next, self.factory.spawn()),
        };
        self.can_hold = false;
        self.enter(incoming);
        true
    }

    /// Put a piece into play, ending the game if it lands on tiles.
    fn enter(&mut self, piece: Piece) -> bool {
        if piece.overlaps(&self.grid) {
            info!(
                "spawn blocked for {} piece; game over with score {}",
                piece.kind().as_str(),
                self.grid.score()
            );
            self.grid.set_game_over();
            self.current = None;
            return false;
        }
        self.current = Some(piece);
        true
    }

    /// Lock the current piece, resolve the grid, and bring in the next piece.
    pub fn lock_current(&mut self) -> LockReport {
        let mut report = LockReport::default();
        let Some(piece) = self.current.take() else {
            return report;
        };

        let kind = piece.kind();
        let (tiles, blc) = piece.into_min_bounded_tiles();
        self.pieces_locked = self.pieces_locked.wrapping_add(1);
        self.can_hold = true;

        if self.grid.lock(tiles, blc) {
            report.overflow = true;
            info!(
                "{} piece locked above the grid; game over with score {}",
                kind.as_str(),
                self.grid.score()
            );
            return report;
        }

        report.resolve = self.grid.resolve();
        debug!(
            "locked {} at ({}, {}): {} rows, {} merges, {} flying, +{}",
            kind.as_str(),
            blc.x,
            blc.y,
            report.resolve.rows_cleared,
            report.resolve.merges,
            report.resolve.flying_removed,
            report.resolve.score_gained
        );

        if self.grid.game_over() {
            info!(
                "game finished ({}) with score {}",
                GameOutcome::from_score(self.grid.score()).as_str(),
                self.grid.score()
            );
            return report;
        }

        let incoming = std::mem::replace(&mut self.next, self.factory.spawn());
        report.spawn_blocked = !self.enter(incoming);
        report
    }

    /// Throw away the grid and pieces and start a new episode.
    pub fn restart(&mut self) {
        let seed = self.factory.next_seed();
        let episode_id = self.episode_id.wrapping_add(1);
        info!(
            "restart: episode {} ended with score {}",
            self.episode_id,
            self.grid.score()
        );
        *self = Self::new(self.config.clone().with_seed(seed));
        self.episode_id = episode_id;
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        out.cells.extend(self.grid.values());
        out.active = self.current.as_ref().map(ActiveSnapshot::from);
        out.next = Some(self.next.kind());
        out.held = self.held.as_ref().map(Piece::kind);
        out.can_hold = self.can_hold;
        out.score = self.grid.score();
        out.paused = self.paused;
        out.game_over = self.grid.game_over();
        out.outcome = self.grid.outcome();
        out.episode_id = self.episode_id;
        out.seed = self.config.seed();
        out.pieces_locked = self.pieces_locked;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(GameConfig::new(12, 18, 250).unwrap().with_seed(12345))
    }

    #[test]
    fn test_new_session() {
        let s = session();
        assert!(s.current().is_some());
        assert!(!s.game_over());
        assert!(!s.paused());
        assert_eq!(s.score(), 0);
        assert_eq!(s.episode_id(), 0);
        assert!(s.held().is_none());
        assert!(s.can_hold());
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = session();
        let b = session();
        assert_eq!(a.current(), b.current());
        assert_eq!(a.next_piece(), b.next_piece());
    }

    #[test]
    fn test_spawn_stays_inside_walls() {
        let mut factory = PieceFactory::new(&GameConfig::new(12, 18, 250).unwrap());
        for _ in 0..200 {
            let piece = factory.spawn();
            for cell in piece.cells() {
                assert!((0..12).contains(&cell.position.x));
                assert!(cell.position.y >= 17);
            }
        }
    }

    #[test]
    fn test_queue_applies_one_command_per_tick() {
        let mut s = session();
        assert!(s.enqueue(GameAction::Pause));
        assert!(s.enqueue(GameAction::Pause));
        let r = s.tick();
        assert_eq!(r.action, Some(GameAction::Pause));
        assert!(s.paused());
        assert_eq!(s.pending_commands(), 1);
        s.tick();
        assert!(!s.paused());
    }

    #[test]
    fn test_queue_capacity() {
        let mut s = session();
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            assert!(s.enqueue(GameAction::MoveLeft));
        }
        assert!(!s.enqueue(GameAction::MoveLeft));
    }

    #[test]
    fn test_paused_blocks_gravity_and_moves() {
        let mut s = session();
        s.apply_action(GameAction::Pause);
        let before = s.current().unwrap().anchor();
        let r = s.tick();
        assert!(!r.moved_down);
        assert!(!s.apply_action(GameAction::MoveLeft));
        assert_eq!(s.current().unwrap().anchor(), before);
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut s = session();
        s.grid_mut().set_tile(0, 0, crate::tile::Tile::new(2));
        assert!(s.apply_action(GameAction::Restart));
        assert_eq!(s.episode_id(), 1);
        assert_eq!(s.grid().tile_count(), 0);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut s = session();
        assert!(s.apply_action(GameAction::Quit));
        assert!(s.quit_requested());
    }
}
