use std::{mem, time::Duration};

use log::{debug, info};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{
        board::Board,
        collision::{collides, drop_distance, rotate_with_kicks},
        piece::Piece,
    },
};

use super::{
    config::EngineConfig,
    event::{Events, GameEvent},
    piece_generator::{GameSeed, PieceGenerator},
    score_board::ScoreBoard,
    snapshot::Snapshot,
};

/// Rows at the top of the board that must be empty when a piece locks.
pub const TOP_OUT_ROWS: usize = 2;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

/// Everything a host can ask the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Hold,
    TogglePause,
    Reset,
    /// Advance the gravity clock by the elapsed time.
    Tick(Duration),
}

/// Complete state of one game session.
///
/// Every action is total: an illegal move, a rotation without room, or a
/// second hold in the same turn simply leaves the state unchanged and emits no
/// events. Actions other than [`Action::TogglePause`] and [`Action::Reset`]
/// are ignored unless the phase is [`Phase::Running`].
///
/// The state is a plain value. [`GameState::apply`] is a pure reducer that
/// returns the next state and leaves `self` untouched; the `&mut self` methods
/// perform the same transitions in place.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Action, EngineConfig, GameSeed, GameState};
///
/// let seed = GameSeed::from_bytes([7; 16]);
/// let state = GameState::with_seed(EngineConfig::default(), seed).unwrap();
///
/// let (next, events) = state.apply(Action::HardDrop);
/// assert!(events.iter().any(|e| e.is_locked()));
/// assert_eq!(next.stats().completed_pieces(), 1);
/// assert_eq!(state.stats().completed_pieces(), 0);
///
/// let (next, _) = next.apply(Action::Tick(Duration::from_millis(16)));
/// assert!(next.phase().is_running());
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Piece,
    next: Piece,
    held: Option<Piece>,
    can_hold: bool,
    stats: ScoreBoard,
    drop_accumulator: Duration,
    phase: Phase,
    generator: PieceGenerator,
}

impl GameState {
    /// Starts a session with a random seed.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a session whose piece sequence is fully determined by `seed`.
    pub fn with_seed(config: EngineConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.empty_board()?;
        let generator = PieceGenerator::with_seed(seed, config.color_policy);
        Ok(Self::start(config, board, generator))
    }

    fn start(config: EngineConfig, board: Board, mut generator: PieceGenerator) -> Self {
        let active = generator.next_piece(config.width);
        let next = generator.next_piece(config.width);
        Self {
            config,
            board,
            active,
            next,
            held: None,
            can_hold: true,
            stats: ScoreBoard::new(config.base_drop_interval),
            drop_accumulator: Duration::ZERO,
            phase: Phase::Running,
            generator,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn stats(&self) -> &ScoreBoard {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.stats.drop_interval()
    }

    /// Time accumulated towards the next gravity step.
    #[must_use]
    pub fn drop_accumulator(&self) -> Duration {
        self.drop_accumulator
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Where the active piece would land if hard-dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.active
            .shifted(0, drop_distance(&self.board, &self.active))
    }

    /// Immutable, serializable view for renderers and recorders.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    /// Returns the state after `action` together with the events it emitted.
    #[must_use]
    pub fn apply(&self, action: Action) -> (Self, Events) {
        let mut next = self.clone();
        let events = next.perform(action);
        (next, events)
    }

    /// Performs `action` in place.
    pub fn perform(&mut self, action: Action) -> Events {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::Rotate => self.rotate(),
            Action::Hold => self.hold(),
            Action::TogglePause => self.toggle_pause(),
            Action::Reset => self.reset(),
            Action::Tick(delta) => self.tick(delta),
        }
    }

    pub fn move_left(&mut self) -> Events {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> Events {
        self.shift(1)
    }

    fn shift(&mut self, dx: i32) -> Events {
        let mut events = Events::new();
        if self.phase.is_running() && !collides(&self.board, &self.active, dx, 0) {
            self.active = self.active.shifted(dx, 0);
            events.push(GameEvent::Moved);
        }
        events
    }

    /// One row of gravity; locks immediately when the piece is resting.
    pub fn soft_drop(&mut self) -> Events {
        let mut events = Events::new();
        if self.phase.is_running() && self.apply_gravity(&mut events) {
            events.push(GameEvent::SoftDropped);
        }
        events
    }

    /// Drops the active piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> Events {
        let mut events = Events::new();
        if !self.phase.is_running() {
            return events;
        }
        let rows = drop_distance(&self.board, &self.active);
        self.active = self.active.shifted(0, rows);
        events.push(GameEvent::HardDropped {
            rows: usize::try_from(rows).unwrap_or_default(),
        });
        self.lock_piece(&mut events);
        events
    }

    pub fn rotate(&mut self) -> Events {
        let mut events = Events::new();
        if !self.phase.is_running() {
            return events;
        }
        if let Some(piece) = rotate_with_kicks(&self.board, &self.active) {
            self.active = piece;
            events.push(GameEvent::Rotated);
        }
        events
    }

    /// Moves the active piece into the hold slot, once per lock.
    ///
    /// With an empty slot the next piece becomes active; otherwise the held
    /// piece comes back at the spawn position, keeping its orientation.
    pub fn hold(&mut self) -> Events {
        let mut events = Events::new();
        if !self.phase.is_running() || !self.can_hold {
            return events;
        }
        let width = self.config.width;
        let current = self.active.spawned(width);
        self.active = match self.held.replace(current) {
            Some(held) => held.spawned(width),
            None => mem::replace(&mut self.next, self.generator.next_piece(width)),
        };
        self.can_hold = false;
        events.push(GameEvent::Held);
        events
    }

    /// Switches between running and paused. The drop accumulator is kept as is.
    pub fn toggle_pause(&mut self) -> Events {
        let mut events = Events::new();
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                events.push(GameEvent::Paused);
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                events.push(GameEvent::Resumed);
            }
            Phase::GameOver => {}
        }
        events
    }

    /// Replaces the session with a fresh one, whatever the current phase.
    ///
    /// The new piece sequence is seeded from the current generator, so a
    /// replay of the same actions reaches the same state.
    pub fn reset(&mut self) -> Events {
        let seed = self.generator.next_seed();
        let generator = PieceGenerator::with_seed(seed, self.config.color_policy);
        info!(
            "restarting session (score {}, level {}, lines {})",
            self.score(),
            self.level(),
            self.lines_cleared()
        );
        *self = Self::start(self.config, self.board.emptied(), generator);
        let mut events = Events::new();
        events.push(GameEvent::Restarted);
        events
    }

    /// Advances the gravity clock.
    ///
    /// Once the accumulated time exceeds the drop interval, one gravity step
    /// runs and the accumulator restarts from zero. A single call never moves
    /// the piece more than one row, however large `delta` is.
    pub fn tick(&mut self, delta: Duration) -> Events {
        let mut events = Events::new();
        if !self.phase.is_running() {
            return events;
        }
        self.drop_accumulator = self.drop_accumulator.saturating_add(delta);
        if self.drop_accumulator > self.stats.drop_interval() {
            self.drop_accumulator = Duration::ZERO;
            self.apply_gravity(&mut events);
        }
        events
    }

    /// Moves the active piece down one row, or locks it if it is resting.
    ///
    /// Returns `true` if the piece moved.
    fn apply_gravity(&mut self, events: &mut Events) -> bool {
        if collides(&self.board, &self.active, 0, 1) {
            self.lock_piece(events);
            return false;
        }
        self.active = self.active.shifted(0, 1);
        true
    }

    fn lock_piece(&mut self, events: &mut Events) {
        // A piece that never left the spawn row, or a stack reaching the top
        // rows, ends the game; the piece is discarded.
        if self.active.y() <= 0 || self.board.has_occupied_in_top_rows(TOP_OUT_ROWS) {
            self.top_out(events);
            return;
        }

        let (board, cleared_lines) = self.board.merged(&self.active).cleared();
        self.board = board;
        events.push(GameEvent::Locked);

        let outcome = self.stats.record_lock(cleared_lines);
        debug!(
            "locked {:?} at ({}, {}): {cleared_lines} lines, +{} points",
            self.active.kind(),
            self.active.x(),
            self.active.y(),
            outcome.points
        );
        if cleared_lines > 0 {
            events.push(GameEvent::LinesCleared(cleared_lines));
        }
        if let Some(level) = outcome.level_up {
            debug!("level up to {level}, drop interval {:?}", self.stats.drop_interval());
            events.push(GameEvent::LevelUp(level));
        }

        self.can_hold = true;
        self.active = mem::replace(&mut self.next, self.generator.next_piece(self.config.width));

        if collides(&self.board, &self.active, 0, 0) {
            self.top_out(events);
        }
    }

    fn top_out(&mut self, events: &mut Events) {
        self.phase = Phase::GameOver;
        info!(
            "game over: score {}, level {}, lines {}",
            self.score(),
            self.level(),
            self.lines_cleared()
        );
        events.push(GameEvent::GameOver);
    }
}
