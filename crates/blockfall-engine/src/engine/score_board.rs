use std::time::Duration;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

/// Lines needed per level.
pub const LINES_PER_LEVEL: usize = 10;

/// Score, level, and line counters with the gravity interval they imply.
///
/// - **Score**: `SCORE_TABLE[lines] * level` per lock, using the level in
///   effect before the lock
/// - **Level**: `total_lines / 10 + 1`
/// - **Drop interval**: base interval divided by the level, recomputed only
///   when the level changes
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::ScoreBoard;
///
/// let mut stats = ScoreBoard::new(Duration::from_millis(800));
/// stats.record_lock(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u64,
    level: usize,
    total_cleared_lines: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    base_drop_interval: Duration,
    drop_interval: Duration,
}

/// What a single lock changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub points: u64,
    /// The new level, if this lock crossed a level boundary.
    pub level_up: Option<usize>,
}

impl ScoreBoard {
    #[must_use]
    pub const fn new(base_drop_interval: Duration) -> Self {
        Self {
            score: 0,
            level: 1,
            total_cleared_lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            base_drop_interval,
            drop_interval: base_drop_interval,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by number of lines cleared.
    ///
    /// Index 0 counts locks that cleared nothing; index 4 counts four-line clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Time between two gravity steps at the current level.
    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Updates the counters after a piece locks and `cleared_lines` rows were removed.
    pub fn record_lock(&mut self, cleared_lines: usize) -> LockOutcome {
        let index = cleared_lines.min(SCORE_TABLE.len() - 1);
        let points = SCORE_TABLE[index] * u64::try_from(self.level).unwrap_or(u64::MAX);

        self.completed_pieces += 1;
        self.line_cleared_counter[index] += 1;
        self.score += points;
        self.total_cleared_lines += cleared_lines;

        let level = self.total_cleared_lines / LINES_PER_LEVEL + 1;
        let mut level_up = None;
        if level != self.level {
            self.level = level;
            self.drop_interval = self.base_drop_interval / u32::try_from(level).unwrap_or(u32::MAX);
            level_up = Some(level);
        }

        LockOutcome { points, level_up }
    }
}
