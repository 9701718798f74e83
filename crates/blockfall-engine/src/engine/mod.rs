//! Game rules and session state.
//!
//! This module drives the core data structures through a full game:
//!
//! - [`GameState`] - Session state machine and action reducer
//! - [`ScoreBoard`] - Score, level, line counters and the gravity interval
//! - [`PieceGenerator`] - Seeded uniform piece source
//! - [`GameEvent`] - Notifications returned by every action
//! - [`Snapshot`] - Serializable view of a state
//!
//! # Game Flow
//!
//! 1. Build a [`GameState`] from an [`EngineConfig`] and optionally a [`GameSeed`]
//! 2. Feed player input as [`Action`]s and elapsed time as [`Action::Tick`]
//! 3. A piece locks when it cannot fall further; full rows are cleared and scored
//! 4. The next piece spawns; the game ends when the stack reaches the top
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Action, EngineConfig, GameEvent, GameState};
//!
//! let mut state = GameState::new(EngineConfig::default()).unwrap();
//!
//! state.perform(Action::MoveLeft);
//! state.perform(Action::Rotate);
//! state.perform(Action::Tick(Duration::from_millis(16)));
//!
//! let events = state.perform(Action::HardDrop);
//! if events.contains(&GameEvent::GameOver) {
//!     println!("Game over!");
//! }
//! ```

pub use self::{
    config::*, event::*, game_state::*, piece_generator::*, score_board::*, snapshot::*,
};

mod config;
mod event;
mod game_state;
mod piece_generator;
mod score_board;
mod snapshot;
