use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Board, ConfigError};

pub const DEFAULT_BOARD_WIDTH: usize = 10;
pub const DEFAULT_BOARD_HEIGHT: usize = 20;
/// The I piece spans four columns and top-out inspects the top two rows.
pub const MIN_BOARD_WIDTH: usize = 4;
pub const MIN_BOARD_HEIGHT: usize = 4;
/// Gravity interval at level 1.
pub const BASE_DROP_INTERVAL: Duration = Duration::from_millis(800);

/// How a freshly drawn piece gets its color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorPolicy {
    /// Uniformly random palette entry, independent of the piece kind.
    #[default]
    Independent,
    /// [`PieceKind::canonical_color`](crate::PieceKind::canonical_color).
    ByKind,
}

/// Static parameters of a game session.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ColorPolicy, EngineConfig};
///
/// let config = EngineConfig {
///     color_policy: ColorPolicy::ByKind,
///     ..EngineConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!((config.width, config.height), (10, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    pub base_drop_interval: Duration,
    pub color_policy: ColorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            base_drop_interval: BASE_DROP_INTERVAL,
            color_policy: ColorPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_drop_interval.is_zero() {
            return Err(ConfigError::ZeroDropInterval);
        }
        Board::new(self.height, self.width).map(|_| ())
    }

    pub(crate) fn empty_board(&self) -> Result<Board, ConfigError> {
        Board::new(self.height, self.width)
    }
}
