use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::piece::{Color, Piece},
    engine::{MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH},
};

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Color),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// `.` for empty cells, otherwise the color character.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(color) => color.as_char(),
        }
    }
}

/// Fixed-size grid of locked cells, row 0 at the top.
///
/// A board never references pieces; merging and collision take both as
/// arguments. Every row holds exactly [`Board::width`] cells and the
/// dimensions never change after construction.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Color, Piece, PieceKind};
///
/// let board = Board::new(20, 10).unwrap();
/// let piece = Piece::new(PieceKind::I, Color::Cyan).shifted(0, 19);
/// let merged = board.merged(&piece);
/// assert!(!merged.is_row_full(19));
/// assert!(board.rows().flatten().all(|cell| cell.is_empty()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty `height × width` board.
    pub fn new(height: usize, width: usize) -> Result<Self, ConfigError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            rows: vec![vec![Cell::Empty; width]; height],
        })
    }

    /// Builds a board from explicit rows.
    ///
    /// Fails when the rows are not all the same length or the board is too small.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, ConfigError> {
        let width = rows.first().map_or(0, Vec::len);
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ConfigError::RaggedRow {
                row,
                len: cells.len(),
                width,
            });
        }
        check_dimensions(width, rows.len())?;
        Ok(Self { width, rows })
    }

    /// Returns an empty board with the same dimensions.
    #[must_use]
    pub fn emptied(&self) -> Self {
        Self {
            width: self.width,
            rows: vec![vec![Cell::Empty; self.width]; self.rows.len()],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y)?.get(x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns `true` if every cell of row `y` is occupied.
    ///
    /// Rows outside the board are never full.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows.get(y).is_some_and(|row| row_is_full(row))
    }

    /// Returns `true` if any of the topmost `count` rows holds an occupied cell.
    #[must_use]
    pub fn has_occupied_in_top_rows(&self, count: usize) -> bool {
        self.rows
            .iter()
            .take(count)
            .flatten()
            .any(|cell| cell.is_occupied())
    }

    /// Returns a copy of this board with the piece written into it.
    ///
    /// Cells above row 0 are dropped; `self` is left untouched.
    #[must_use]
    pub fn merged(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = board.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Cell::Occupied(piece.color());
            }
        }
        board
    }

    /// Removes every full row and returns the compacted board with the number
    /// of rows removed.
    ///
    /// Remaining rows keep their relative order; as many empty rows as were
    /// removed are inserted at the top.
    #[must_use]
    pub fn cleared(&self) -> (Self, usize) {
        let kept: Vec<_> = self
            .rows
            .iter()
            .filter(|row| !row_is_full(row))
            .cloned()
            .collect();
        let count = self.rows.len() - kept.len();
        let mut rows = vec![vec![Cell::Empty; self.width]; count];
        rows.extend(kept);
        (
            Self {
                width: self.width,
                rows,
            },
            count,
        )
    }
}

fn row_is_full(row: &[Cell]) -> bool {
    row.iter().all(|cell| cell.is_occupied())
}

fn check_dimensions(width: usize, height: usize) -> Result<(), ConfigError> {
    if width < MIN_BOARD_WIDTH || height < MIN_BOARD_HEIGHT {
        return Err(ConfigError::BoardTooSmall { width, height });
    }
    Ok(())
}
