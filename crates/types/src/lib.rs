//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no I/O, usable from the rules engine, the
//! timing runtime and any renderer or input layer built on top of them.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 22 rows (indexed 0-21, y grows downward)
//! - **Buffer**: the top 2 rows sit above the visible skyline
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_GRAVITY_MS` | 500 | Gravity interval with 0 lines cleared |
//! | `GRAVITY_STEP_MS` | 50 | Speed-up applied every `LINES_PER_SPEEDUP` lines |
//! | `GRAVITY_FLOOR_MS` | 100 | Fastest gravity interval |
//! | `LOCK_DELAY_MS` | 500 | Grace period before a grounded piece locks |
//! | `LINE_CLEAR_DELAY_MS` | 200 | Clear animation before rows collapse |
//!
//! # Examples
//!
//! ```
//! use tetris_engine_types::{Command, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//! assert_eq!(piece.code(), 3);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(5), Rotation::East);
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells, buffer rows included (22 rows)
pub const BOARD_HEIGHT: u8 = 22;

/// Board height as a `usize`, for fixed-capacity row lists.
pub const BOARD_ROWS: usize = BOARD_HEIGHT as usize;

/// Gravity interval before any speed-up
pub const BASE_GRAVITY_MS: u32 = 500;

/// Gravity speed-up per `LINES_PER_SPEEDUP` cleared lines
pub const GRAVITY_STEP_MS: u32 = 50;

/// Fastest gravity interval
pub const GRAVITY_FLOOR_MS: u32 = 100;

/// Cleared lines per gravity step
pub const LINES_PER_SPEEDUP: u32 = 10;

/// Lock delay when a piece is grounded
pub const LOCK_DELAY_MS: u32 = 500;

/// Pause between stamping a clearing piece and collapsing the rows
pub const LINE_CLEAR_DELAY_MS: u32 = 200;

/// Line clear scoring table, indexed by lines cleared (0-4).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// T-Spin scoring table, indexed by lines cleared (0-2).
///
/// Any other line count scores the no-line entry.
pub const TSPIN_SCORES: [u32; 3] = [400, 800, 1200];

/// Points per cell descended by a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per cell descended by a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Occupied diagonal corners needed for a T-Spin
pub const TSPIN_CORNER_THRESHOLD: u8 = 3;


/// The seven tetromino piece kinds
///
/// The declaration order fixes each kind's 1-indexed cell code:
/// I=1, O=2, T=3, S=4, Z=5, J=6, L=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in cell-code order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Nonzero board cell code for this kind
    pub fn code(&self) -> u8 {
        *self as u8 + 1
    }

    /// Inverse of [`PieceKind::code`]; `0` and unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 90° counter-clockwise (index 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation for an arbitrary index, taken modulo 4
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Index 0..=3, clockwise from spawn
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate in the given direction
    pub fn rotate(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }
}

/// Commands accepted by the engine
///
/// Input layers translate gestures or keys into these; timer ticks are not
/// commands and reach the engine through the runtime instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (1 point per cell)
    SoftDrop,
    /// Drop piece to its landing row and lock it (2 points per cell)
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (once per piece)
    Hold,
    /// Suspend gravity and lock delay
    Pause,
    /// Re-arm gravity after a pause
    Resume,
    /// Discard the game and start a fresh one
    Restart,
}

impl Command {
    /// Horizontal command for a signed step; anything but ±1 is rejected.
    pub fn horizontal(dx: i8) -> Option<Self> {
        match dx {
            -1 => Some(Command::MoveLeft),
            1 => Some(Command::MoveRight),
            _ => None,
        }
    }

    /// Parse command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_engine_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("ROTATECCW"), Some(Command::RotateCcw));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            "hold" => Some(Command::Hold),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "restart" => Some(Command::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::Hold => "hold",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Restart => "restart",
        }
    }

    /// Whether the command moves or swaps the current piece
    pub fn is_piece_command(&self) -> bool {
        !matches!(self, Command::Pause | Command::Resume | Command::Restart)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell (code 0)
/// - `Some(PieceKind)`: Cell filled by a locked piece (code `kind.code()`)
pub type Cell = Option<PieceKind>;
