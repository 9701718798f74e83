use std::iter;

use blockfall_engine::{Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// The playfield with the active piece and its landing preview on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    active_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            active_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn active_piece(self, piece: Piece) -> Self {
        Self {
            active_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(self.board.width())
            .saturating_mul(BlockDisplay::width())
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.board.height())
            .saturating_mul(BlockDisplay::height())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    fn tiles(&self) -> Vec<Vec<BlockDisplay>> {
        let mut tiles: Vec<Vec<_>> = self
            .board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|&cell| BlockDisplay::from_cell(cell, true))
                    .collect()
            })
            .collect();
        if let Some(ghost) = self.ghost {
            paint(&mut tiles, &ghost, BlockDisplay::ghost());
        }
        if let Some(piece) = self.active_piece {
            paint(&mut tiles, &piece, BlockDisplay::from_color(piece.color()));
        }
        tiles
    }
}

/// Overwrites the tiles under `piece`; cells off the board are skipped.
fn paint(tiles: &mut [Vec<BlockDisplay>], piece: &Piece, display: BlockDisplay) {
    for (x, y) in piece.occupied_positions() {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        if let Some(tile) = tiles.get_mut(y).and_then(|row| row.get_mut(x)) {
            *tile = display;
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.tiles()) {
            for (grid_cell, tile) in iter::zip(grid_row, row) {
                tile.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Color, PieceKind};

    use super::*;

    #[test]
    fn test_active_piece_is_drawn_over_ghost() {
        let board = Board::new(20, 10).unwrap();
        let piece = Piece::new(PieceKind::O, Color::Yellow).spawned(10);
        let ghost = piece.shifted(0, 18);
        let tiles = BoardDisplay::new(&board)
            .ghost(ghost)
            .active_piece(piece)
            .tiles();

        assert_eq!(tiles[0][4], BlockDisplay::from_color(Color::Yellow));
        assert_eq!(tiles[19][5], BlockDisplay::ghost());
        assert_eq!(tiles[10][4], BlockDisplay::empty(true));

        // Ghost and active piece overlap once the piece has landed.
        let tiles = BoardDisplay::new(&board)
            .ghost(ghost)
            .active_piece(ghost)
            .tiles();
        assert_eq!(tiles[19][5], BlockDisplay::from_color(Color::Yellow));
    }

    #[test]
    fn test_size_follows_board_dimensions() {
        let board = Board::new(24, 12).unwrap();
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!(display.width(), 12 * 2 + 2);
        assert_eq!(display.height(), 24 + 2);
    }

    #[test]
    fn test_cells_above_board_are_skipped() {
        let board = Board::new(20, 10).unwrap();
        let piece = Piece::new(PieceKind::I, Color::Cyan)
            .rotated()
            .shifted(0, -3);
        let tiles = BoardDisplay::new(&board).active_piece(piece).tiles();
        assert_eq!(tiles[0][0], BlockDisplay::from_color(Color::Cyan));
        assert_eq!(tiles[1][0], BlockDisplay::empty(true));
    }
}
