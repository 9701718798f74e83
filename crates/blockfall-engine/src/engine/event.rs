use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Upper bound on events emitted by a single action.
///
/// A hard drop is the busiest action: drop, lock, clear, level up, game over.
pub const MAX_EVENTS_PER_ACTION: usize = 8;

/// Events emitted by one action, in the order they happened.
pub type Events = ArrayVec<GameEvent, MAX_EVENTS_PER_ACTION>;

/// Notification for hosts (audio cues, UI effects, recorders).
///
/// The engine never calls into I/O itself; every action returns the events
/// it produced and the host decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::IsVariant)]
pub enum GameEvent {
    /// The active piece moved one column.
    Moved,
    /// The active piece rotated (possibly with a kick).
    Rotated,
    /// A soft drop moved the active piece one row down.
    SoftDropped,
    /// A hard drop moved the active piece `rows` rows down before locking.
    HardDropped { rows: usize },
    /// The active piece went to the hold slot.
    Held,
    /// The active piece was merged into the board.
    Locked,
    /// Rows were removed by the last lock.
    LinesCleared(usize),
    /// The level increased to the given value.
    LevelUp(usize),
    GameOver,
    Paused,
    Resumed,
    /// A fresh session replaced the previous one.
    Restarted,
}
