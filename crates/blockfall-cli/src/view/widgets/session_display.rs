use blockfall_engine::{GameState, Phase};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Whole game screen: hold and stats on the left, board in the middle, next
/// piece on the right, with a banner while paused or after game over.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    state: &'a GameState,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(state: &'a GameState, show_ghost: bool) -> Self {
        Self {
            state,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Rows needed to draw the screen.
    pub fn height(&self) -> u16 {
        BoardDisplay::new(self.state.board())
            .block(Block::bordered())
            .height()
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let state = self.state;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match state.phase() {
            Phase::Running => color::WHITE,
            Phase::Paused => color::YELLOW,
            Phase::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = {
            let widget = BoardDisplay::new(state.board())
                .active_piece(*state.active_piece())
                .block(
                    Block::bordered()
                        .border_style(border_style)
                        .style(style::DEFAULT),
                );
            if self.show_ghost && state.phase().is_running() {
                widget.ghost(state.ghost_piece())
            } else {
                widget
            }
        };
        let hold_panel = {
            let panel = PieceDisplay::new().block(panel("HOLD"));
            match state.held_piece() {
                Some(piece) => panel.piece(*piece),
                None => panel,
            }
        };
        let next_panel = PieceDisplay::new()
            .piece(*state.next_piece())
            .block(panel("NEXT"));
        let stats = StatsDisplay::new(state).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match state.phase() {
            Phase::Running => None,
            Phase::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            Phase::GameOver => Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED))),
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
