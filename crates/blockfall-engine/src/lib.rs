pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid engine configuration, detected when a board or game state is built.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board must be at least {}x{}, got {width}x{height}",
        MIN_BOARD_WIDTH,
        MIN_BOARD_HEIGHT
    )]
    BoardTooSmall { width: usize, height: usize },
    #[display("board row {row} has {len} cells, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
    #[display("base drop interval must be non-zero")]
    ZeroDropInterval,
}
