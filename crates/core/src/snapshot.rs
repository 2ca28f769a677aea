//! Observable game state
//!
//! A [`GameState`] is an immutable value: the engine builds a new one for
//! every accepted transition and observers receive whole snapshots.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::board::{Board, RowList};
use crate::pieces::Piece;
use crate::scoring::gravity_interval_ms;

/// Where the current piece is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Piece in the air (or resting without a lock delay armed)
    #[default]
    Falling,
    /// Piece grounded with the lock delay running
    Locking,
    /// Full rows flagged, waiting for the line-clear delay
    Clearing,
    /// Terminal until restart
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GameState {
    pub board: Board,
    /// Absent while a line clear is pending and after game over
    pub current: Option<Piece>,
    pub next: Piece,
    pub held: Option<Piece>,
    pub can_hold: bool,
    pub score: u32,
    pub lines_cleared: u32,
    /// Gravity interval in milliseconds
    pub gravity_ms: u32,
    /// Rows flagged for the clear animation, top to bottom
    pub clearing_lines: RowList,
    /// Landing position of `current`
    pub ghost: Option<Piece>,
    pub game_over: bool,
    pub paused: bool,
    pub phase: Phase,
    /// Increments each time a piece enters play
    pub piece_id: u32,
}

impl GameState {
    /// Fresh game on an empty board
    pub fn new(current: Piece, next: Piece) -> Self {
        let board = Board::new();
        let ghost = Some(ghost_of(&board, &current));
        Self {
            board,
            current: Some(current),
            next,
            held: None,
            can_hold: true,
            score: 0,
            lines_cleared: 0,
            gravity_ms: gravity_interval_ms(0),
            clearing_lines: RowList::new(),
            ghost,
            game_over: false,
            paused: false,
            phase: Phase::Falling,
            piece_id: 1,
        }
    }

    /// Whether piece commands and gravity are accepted
    pub fn playable(&self) -> bool {
        self.current.is_some() && !self.game_over && !self.paused && self.phase != Phase::Clearing
    }

    /// Recompute the ghost from `current` and `board`
    pub fn refresh_ghost(&mut self) {
        self.ghost = self.current.map(|piece| ghost_of(&self.board, &piece));
    }
}

/// Project `piece` straight down until it rests on the stack or floor
pub fn ghost_of(board: &Board, piece: &Piece) -> Piece {
    piece.shifted(0, board.drop_distance(piece))
}
