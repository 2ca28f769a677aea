//! Property tests: random command and timer streams keep the engine consistent

use proptest::prelude::*;
use tetris_engine::core::{Engine, Phase};
use tetris_engine::types::{Command, BOARD_HEIGHT};

#[derive(Debug, Clone, Copy)]
enum Event {
    Command(Command),
    Gravity,
    LockDelay,
    LineClear,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Command(Command::MoveLeft)),
        Just(Event::Command(Command::MoveRight)),
        Just(Event::Command(Command::SoftDrop)),
        Just(Event::Command(Command::HardDrop)),
        Just(Event::Command(Command::RotateCw)),
        Just(Event::Command(Command::RotateCcw)),
        Just(Event::Command(Command::Hold)),
        Just(Event::Command(Command::Pause)),
        Just(Event::Command(Command::Resume)),
        Just(Event::Gravity),
        Just(Event::LockDelay),
        Just(Event::LineClear),
    ]
}

fn fire(engine: &mut Engine, event: Event) {
    match event {
        Event::Command(command) => {
            engine.apply(command);
        }
        Event::Gravity => {
            engine.gravity_tick();
        }
        Event::LockDelay => {
            engine.lock_delay_expired();
        }
        Event::LineClear => {
            engine.finish_line_clear();
        }
    }
}

proptest! {
    #[test]
    fn random_play_keeps_invariants(
        seed in any::<u64>(),
        events in prop::collection::vec(event(), 1..300),
    ) {
        let mut engine = Engine::with_seed(seed);

        for event in events {
            let before = engine.state().clone();
            fire(&mut engine, event);
            let state = engine.state();

            prop_assert!(state.score >= before.score);
            prop_assert!(state.lines_cleared >= before.lines_cleared);

            if let Some(current) = state.current {
                prop_assert!(state.board.is_valid_position(&current));
                let ghost = state.ghost.unwrap();
                prop_assert_eq!(ghost.x, current.x);
                prop_assert!(ghost.y >= current.y);
                prop_assert!(state.board.is_grounded(&ghost));
            }

            match state.phase {
                Phase::Clearing => {
                    prop_assert!(state.current.is_none());
                    prop_assert!(!state.clearing_lines.is_empty());
                }
                Phase::GameOver => {
                    prop_assert!(state.game_over);
                    prop_assert!(state.current.is_none());
                }
                Phase::Falling | Phase::Locking => {
                    prop_assert!(state.clearing_lines.is_empty());
                    prop_assert!(state.current.is_some());
                }
            }

            // Rows never stay full outside a pending clear.
            if state.phase != Phase::Clearing {
                for y in 0..BOARD_HEIGHT as usize {
                    prop_assert!(!state.board.is_row_full(y));
                }
            }

            if state.game_over {
                break;
            }
        }
    }

    #[test]
    fn same_seed_same_game(seed in any::<u64>(), events in prop::collection::vec(event(), 1..100)) {
        let mut a = Engine::with_seed(seed);
        let mut b = Engine::with_seed(seed);
        for event in events {
            fire(&mut a, event);
            fire(&mut b, event);
        }
        prop_assert_eq!(a.state(), b.state());
    }
}
