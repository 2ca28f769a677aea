//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and piece lifecycle.
//! It has **zero dependencies** on rendering, input, clocks or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is reachable from a plain function call
//! - **Portable**: Timing is the caller's job; the engine only says which timers to arm
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 game board with collision detection, line clearing and T-Spin corners
//! - [`engine`]: the state machine turning commands and timer fires into new states
//! - [`pieces`]: Tetromino shape definitions and SRS rotation with wall kicks
//! - [`rng`]: bag random piece generation for fair distribution
//! - [`scoring`]: line clear, T-Spin and drop points plus the gravity curve
//! - [`snapshot`]: the immutable [`GameState`] observers receive
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: Pieces are drawn from a shuffled bag of 7 (or 35)
//! - **SRS Rotation**: Super Rotation System with wall kicks for all pieces except O
//! - **Lock Delay**: 500ms before a grounded piece locks; moves and rotations restart it
//! - **Line Clear Delay**: 200ms with the full rows flagged before they collapse
//! - **Ghost Piece**: Shows where the current piece will land
//! - **Hold**: Store one piece for later use (once per piece)
//! - **T-Spin Detection**: 3 of 4 diagonal corners occupied after a rotation
//!
//! # Example
//!
//! ```
//! use tetris_engine_core::{Engine, TimerAction};
//! use tetris_engine_core::types::Command;
//!
//! let mut engine = Engine::with_seed(12345);
//!
//! engine.apply(Command::MoveRight);
//! engine.apply(Command::RotateCw);
//! let step = engine.apply(Command::HardDrop);
//!
//! assert!(step.changed);
//! assert_eq!(step.lock_delay, TimerAction::Cancel);
//! assert!(engine.state().score > 0); // Hard drop awards points
//! ```

pub mod board;
pub mod engine;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_engine_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use engine::{Engine, GravityAction, Step, TimerAction};
pub use pieces::{kick_offsets, shape_for, try_rotate, Form, Piece, Shape};
pub use rng::{FixedSequence, PieceBag, Randomizer};
pub use scoring::{drop_score, gravity_interval_ms, line_clear_score};
pub use snapshot::{GameState, Phase};
