use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by the runtime.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Clock tick carrying the wall time since the previous tick.
    Tick(Duration),
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}
