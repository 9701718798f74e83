use serde::Serialize;

use crate::core::piece::Piece;

use super::game_state::{GameState, Phase};

/// Read-only view of a [`GameState`] for renderers and recorders.
///
/// The board is written one string per row, `.` for empty cells and the color
/// character otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Vec<String>,
    pub active: Piece,
    pub ghost: Piece,
    pub next: Piece,
    pub held: Option<Piece>,
    pub can_hold: bool,
    pub score: u64,
    pub level: usize,
    pub lines_cleared: usize,
    pub drop_interval_ms: u64,
    pub phase: Phase,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        let board = state
            .board()
            .rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect();
        Self {
            board,
            active: *state.active_piece(),
            ghost: state.ghost_piece(),
            next: *state.next_piece(),
            held: state.held_piece().copied(),
            can_hold: state.can_hold(),
            score: state.score(),
            level: state.level(),
            lines_cleared: state.lines_cleared(),
            drop_interval_ms: u64::try_from(state.drop_interval().as_millis()).unwrap_or(u64::MAX),
            phase: state.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Action, EngineConfig, GameSeed};

    use super::*;

    #[test]
    fn test_snapshot_of_new_game() {
        let state =
            GameState::with_seed(EngineConfig::default(), GameSeed::from_bytes([3; 16])).unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.board.len(), 20);
        assert!(snapshot.board.iter().all(|row| row == ".........."));
        assert_eq!(snapshot.active, *state.active_piece());
        assert_eq!(snapshot.ghost.x(), snapshot.active.x());
        assert!(snapshot.ghost.y() > snapshot.active.y());
        assert_eq!(snapshot.drop_interval_ms, 800);
        assert_eq!(snapshot.phase, Phase::Running);
    }

    #[test]
    fn test_snapshot_json_fields() {
        let state =
            GameState::with_seed(EngineConfig::default(), GameSeed::from_bytes([3; 16])).unwrap();
        let (state, _) = state.apply(Action::HardDrop);
        let (state, _) = state.apply(Action::TogglePause);

        let value = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(value["phase"], json!("Paused"));
        assert_eq!(value["score"], json!(0));
        assert_eq!(value["level"], json!(1));
        assert_eq!(value["held"], json!(null));
        assert_eq!(value["can_hold"], json!(true));
        assert_eq!(value["board"].as_array().unwrap().len(), 20);
        let bottom = value["board"][19].as_str().unwrap();
        assert!(bottom.chars().any(|c| c != '.'));
        assert!(value["active"]["shape"].is_array());
        assert!(value["next"]["kind"].is_string());
    }
}
