//! Invariants that hold for any seed and any sequence of actions.

use std::time::Duration;

use blockfall_engine::{
    Action, ColorPolicy, EngineConfig, GameEvent, GameSeed, GameState, LINES_PER_LEVEL, PieceKind,
};
use proptest::prelude::*;

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::MoveLeft),
        4 => Just(Action::MoveRight),
        3 => Just(Action::SoftDrop),
        2 => Just(Action::HardDrop),
        4 => Just(Action::Rotate),
        1 => Just(Action::Hold),
        1 => Just(Action::TogglePause),
        3 => (0u64..2000).prop_map(|ms| Action::Tick(Duration::from_millis(ms))),
    ]
}

fn config() -> impl Strategy<Value = EngineConfig> {
    (4usize..16, 4usize..26, any::<bool>()).prop_map(|(width, height, by_kind)| EngineConfig {
        width,
        height,
        color_policy: if by_kind {
            ColorPolicy::ByKind
        } else {
            ColorPolicy::Independent
        },
        ..EngineConfig::default()
    })
}

fn assert_consistent(state: &GameState) {
    let config = state.config();
    let board = state.board();
    assert_eq!(board.width(), config.width);
    assert_eq!(board.height(), config.height);
    assert!(board.rows().all(|row| row.len() == config.width));
    assert_eq!(
        state.level(),
        state.lines_cleared() / LINES_PER_LEVEL + 1,
        "level follows cleared lines"
    );
    assert_eq!(
        state.drop_interval(),
        config.base_drop_interval / u32::try_from(state.level()).unwrap()
    );
    assert!(!board.rows().any(|row| row.iter().all(|c| c.is_occupied())));
}

proptest! {
    #[test]
    fn random_play_keeps_state_consistent(
        seed in any::<[u8; 16]>(),
        config in config(),
        actions in prop::collection::vec(action(), 1..300),
    ) {
        let mut state = GameState::with_seed(config, GameSeed::from_bytes(seed)).unwrap();
        assert_consistent(&state);

        for action in actions {
            let before = state.clone();
            let events = state.perform(action);
            assert_consistent(&state);

            prop_assert!(state.score() >= before.score());
            prop_assert!(state.lines_cleared() >= before.lines_cleared());
            prop_assert!(state.level() >= before.level());

            if before.phase().is_game_over() {
                // Only a reset leaves the game-over phase.
                prop_assert!(events.is_empty());
                prop_assert_eq!(state.snapshot(), before.snapshot());
            }
            if !before.phase().is_running() && !matches!(action, Action::TogglePause) {
                prop_assert!(events.is_empty());
            }
            if let (Action::Tick(_), true) = (action, before.phase().is_running()) {
                prop_assert!(state.drop_accumulator() <= before.drop_interval());
                if !events.contains(&GameEvent::Locked)
                    && !events.contains(&GameEvent::GameOver)
                    && state.active_piece() != before.active_piece()
                {
                    prop_assert_eq!(
                        state.active_piece().y(),
                        before.active_piece().y() + 1,
                        "a tick moves at most one row"
                    );
                }
            }
        }
    }

    #[test]
    fn same_seed_and_actions_replay_identically(
        seed in any::<[u8; 16]>(),
        actions in prop::collection::vec(action(), 1..200),
    ) {
        let run = || {
            let mut state =
                GameState::with_seed(EngineConfig::default(), GameSeed::from_bytes(seed)).unwrap();
            let mut events = Vec::new();
            for &action in &actions {
                events.extend(state.perform(action));
            }
            (state.snapshot(), events)
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn four_rotations_restore_every_shape(kind in prop::sample::select(PieceKind::ALL.to_vec())) {
        let shape = kind.shape();
        let rotated = (0..4).fold(shape, |shape, _| shape.rotated_clockwise());
        prop_assert_eq!(rotated, shape);
    }

    #[test]
    fn reset_always_yields_fresh_running_game(
        seed in any::<[u8; 16]>(),
        actions in prop::collection::vec(action(), 0..200),
    ) {
        let mut state =
            GameState::with_seed(EngineConfig::default(), GameSeed::from_bytes(seed)).unwrap();
        for action in actions {
            state.perform(action);
        }
        let events = state.perform(Action::Reset);
        prop_assert_eq!(events.as_slice(), &[GameEvent::Restarted]);
        prop_assert!(state.phase().is_running());
        prop_assert_eq!(state.score(), 0);
        prop_assert_eq!(state.lines_cleared(), 0);
        prop_assert!(state.held_piece().is_none());
        prop_assert!(state.can_hold());
        prop_assert!(state.board().rows().flatten().all(|c| c.is_empty()));
    }
}

#[test]
fn hard_dropping_forever_ends_the_game() {
    let mut state =
        GameState::with_seed(EngineConfig::default(), GameSeed::from_bytes([9; 16])).unwrap();
    let mut locks = 0;
    while !state.phase().is_game_over() {
        let events = state.perform(Action::HardDrop);
        locks += usize::from(events.contains(&GameEvent::Locked));
        assert!(locks <= 200, "stack never topped out");
    }
    assert!(state.perform(Action::HardDrop).is_empty());
    assert_eq!(state.stats().completed_pieces(), locks);
}
