use std::time::Duration;

use blockfall_engine::{Action, GameState, Phase};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use log::debug;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    tui::{App, Runtime},
    view::widgets::SessionDisplay,
};

const FPS: f64 = 60.0;

/// Interactive session: keys become actions, clock ticks become gravity.
#[derive(Debug)]
pub struct PlayApp {
    state: GameState,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(state: GameState, show_ghost: bool) -> Self {
        Self {
            state,
            show_ghost,
            is_exiting: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn dispatch(&mut self, action: Action) {
        for event in self.state.perform(action) {
            debug!("{action:?} -> {event:?}");
        }
    }
}

/// Key bindings; quitting is handled by the app itself.
fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Down => Action::SoftDrop,
        KeyCode::Up => Action::Rotate,
        KeyCode::Char(' ') => Action::HardDrop,
        KeyCode::Char('c' | 'C') => Action::Hold,
        KeyCode::Char('p' | 'P') => Action::TogglePause,
        KeyCode::Char('r' | 'R') => Action::Reset,
        _ => return None,
    };
    Some(action)
}

fn help_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Running => {
            "← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Hard Drop) | C (Hold) | P (Pause) | R (Restart) | Q (Quit)"
        }
        Phase::Paused => "P (Resume) | R (Restart) | Q (Quit)",
        Phase::GameOver => "R (Restart) | Q (Quit)",
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_frame_rate(FPS);
        runtime.set_tick_rate(Some(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.is_exiting = true,
            code => {
                if let Some(action) = action_for_key(code) {
                    self.dispatch(action);
                }
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.state, self.show_ghost);
        let help_text = Text::from(help_text(self.state.phase()))
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.dispatch(Action::Tick(elapsed));
    }
}
