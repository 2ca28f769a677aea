//! Engine module - the piece lifecycle state machine
//!
//! [`Engine`] owns the current [`GameState`] and the randomizer. Every call
//! is a transition: it either commits a new state or leaves the old one in
//! place, and it returns a [`Step`] telling the caller which timers to arm or
//! cancel. The engine never sleeps or reads a clock.
//!
//! ```text
//! Spawning -> Falling <-> Locking -> Clearing -> Spawning
//!                 \           \          \
//!                  +-----------+----------+--> GameOver
//! ```

use crate::board::Board;
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceBag, Randomizer};
use crate::scoring::{drop_score, gravity_interval_ms, line_clear_score};
use crate::snapshot::{GameState, Phase};
use crate::types::{Command, PieceKind};

/// What the caller should do with a one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerAction {
    /// Leave the timer as it is
    #[default]
    Keep,
    /// (Re)start the timer from zero
    Arm,
    /// Cancel the timer if it is running
    Cancel,
}

/// What the caller should do with the gravity ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityAction {
    #[default]
    Keep,
    /// (Re)start ticking at the state's `gravity_ms`
    Start,
    Stop,
}

/// Effects of one engine transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    /// Whether a new state was committed
    pub changed: bool,
    pub lock_delay: TimerAction,
    pub line_clear: TimerAction,
    pub gravity: GravityAction,
    /// Score to persist as the new high score
    pub save_high_score: Option<u32>,
}

impl Step {
    /// A rejected transition
    pub fn unchanged() -> Self {
        Self::default()
    }

    fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }
}

/// Score and line count held back until the line-clear delay ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingClear {
    points: u32,
    lines: u32,
}

/// The rules engine
pub struct Engine {
    state: GameState,
    randomizer: Box<dyn Randomizer + Send>,
    last_move_was_rotation: bool,
    lock_pending: bool,
    pending_clear: Option<PendingClear>,
    /// Last known persisted high score
    high_score: u32,
}

impl Engine {
    /// Start a game drawing pieces from `randomizer`
    pub fn new(randomizer: impl Randomizer + Send + 'static) -> Self {
        let mut randomizer: Box<dyn Randomizer + Send> = Box::new(randomizer);
        let state = fresh_state(randomizer.as_mut());
        Self {
            state,
            randomizer,
            last_move_was_rotation: false,
            lock_pending: false,
            pending_clear: None,
            high_score: 0,
        }
    }

    /// Start a game on a seeded 7-bag
    pub fn with_seed(seed: u64) -> Self {
        Self::new(PieceBag::new(seed))
    }

    /// Current snapshot
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the state wholesale, e.g. to set up a puzzle position.
    ///
    /// Transient bookkeeping is reset: no lock delay is pending, a flagged
    /// line clear is dropped and the ghost is recomputed.
    pub fn load_state(&mut self, mut state: GameState) {
        state.clearing_lines.clear();
        state.phase = if state.game_over {
            Phase::GameOver
        } else {
            Phase::Falling
        };
        if state.game_over {
            state.current = None;
        }
        state.refresh_ghost();
        self.state = state;
        self.last_move_was_rotation = false;
        self.lock_pending = false;
        self.pending_clear = None;
    }

    /// Place `piece` as the current piece without touching the rest of the state
    pub fn set_current(&mut self, piece: Piece) {
        let mut state = self.state.clone();
        state.current = Some(piece);
        state.game_over = false;
        self.load_state(state);
    }

    /// Overwrite the board, keeping pieces and counters
    pub fn set_board(&mut self, board: Board) {
        let mut state = self.state.clone();
        state.board = board;
        self.load_state(state);
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Record the persisted high score loaded from settings
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
    }

    /// Best of the persisted high score and the running score
    pub fn top_score(&self) -> u32 {
        self.high_score.max(self.state.score)
    }

    /// Whether the lock delay is armed
    pub fn lock_pending(&self) -> bool {
        self.lock_pending
    }

    /// Dispatch a command to its transition
    pub fn apply(&mut self, command: Command) -> Step {
        match command {
            Command::MoveLeft => self.move_horizontal(-1),
            Command::MoveRight => self.move_horizontal(1),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(true),
            Command::RotateCcw => self.rotate(false),
            Command::Hold => self.hold(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Restart => self.restart(),
        }
    }

    fn fits(&self, piece: &Piece) -> bool {
        self.state.board.is_valid_position(piece)
    }

    fn current(&self) -> Option<Piece> {
        if self.state.playable() {
            self.state.current
        } else {
            None
        }
    }

    /// Commit a moved or rotated piece and re-evaluate the lock delay
    fn place(&mut self, piece: Piece, step: &mut Step) {
        self.state.current = Some(piece);
        if self.state.board.is_grounded(&piece) {
            self.lock_pending = true;
            self.state.phase = Phase::Locking;
            step.lock_delay = TimerAction::Arm;
        } else {
            if self.lock_pending {
                step.lock_delay = TimerAction::Cancel;
            }
            self.lock_pending = false;
            self.state.phase = Phase::Falling;
        }
        self.state.refresh_ghost();
    }

    /// Move the current piece one column left (`dx = -1`) or right (`dx = 1`)
    pub fn move_horizontal(&mut self, dx: i8) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        if dx != -1 && dx != 1 {
            return Step::unchanged();
        }
        let candidate = piece.shifted(dx, 0);
        if !self.fits(&candidate) {
            return Step::unchanged();
        }

        let mut step = Step::changed();
        self.last_move_was_rotation = false;
        self.place(candidate, &mut step);
        step
    }

    /// Move down one row for a point, or start the lock delay if blocked
    pub fn soft_drop(&mut self) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        let candidate = piece.shifted(0, 1);
        if self.fits(&candidate) {
            let mut step = Step::changed();
            self.state.score += drop_score(1, false);
            self.last_move_was_rotation = false;
            self.place(candidate, &mut step);
            return step;
        }
        if self.lock_pending {
            return Step::unchanged();
        }
        self.arm_lock_delay()
    }

    fn arm_lock_delay(&mut self) -> Step {
        self.lock_pending = true;
        self.state.phase = Phase::Locking;
        Step {
            lock_delay: TimerAction::Arm,
            ..Step::changed()
        }
    }

    /// Drop to the landing row and lock at once, two points per row
    pub fn hard_drop(&mut self) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        let distance = self.state.board.drop_distance(&piece);
        let landed = piece.shifted(0, distance);
        if distance > 0 {
            self.state.score += drop_score(distance as u32, true);
            self.last_move_was_rotation = false;
        }
        self.state.current = Some(landed);

        let mut step = Step::changed();
        self.lock_current(&mut step);
        step
    }

    /// Rotate with SRS wall kicks; O and fixed shapes are unaffected
    pub fn rotate(&mut self, clockwise: bool) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        let board = &self.state.board;
        let Some(rotated) = try_rotate(&piece, clockwise, |p| board.is_valid_position(p)) else {
            return Step::unchanged();
        };

        let mut step = Step::changed();
        self.last_move_was_rotation = true;
        self.place(rotated, &mut step);
        step
    }

    /// Swap the current piece with the held one, once per piece
    pub fn hold(&mut self) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        if !self.state.can_hold {
            return Step::unchanged();
        }

        let entering = match self.state.held {
            Some(held) => held.respawned(),
            None => {
                let next = self.state.next.respawned();
                self.state.next = Piece::spawn(self.randomizer.draw());
                next
            }
        };
        self.state.held = Some(piece.respawned());
        self.state.can_hold = false;

        let mut step = Step::changed();
        self.enter_play(entering, &mut step);
        step
    }

    /// Gravity: move down one row, or start the lock delay if blocked
    pub fn gravity_tick(&mut self) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        let candidate = piece.shifted(0, 1);
        if self.fits(&candidate) {
            let mut step = Step::changed();
            if self.lock_pending {
                step.lock_delay = TimerAction::Cancel;
            }
            self.lock_pending = false;
            self.last_move_was_rotation = false;
            self.state.current = Some(candidate);
            self.state.phase = Phase::Falling;
            self.state.refresh_ghost();
            return step;
        }
        if self.lock_pending {
            return Step::unchanged();
        }
        self.arm_lock_delay()
    }

    /// Lock delay fired: lock if the piece is still grounded
    pub fn lock_delay_expired(&mut self) -> Step {
        let Some(piece) = self.current() else {
            return Step::unchanged();
        };
        if !self.lock_pending {
            return Step::unchanged();
        }
        self.lock_pending = false;

        let mut step = Step::changed();
        if self.state.board.is_grounded(&piece) {
            self.lock_current(&mut step);
        } else {
            self.state.phase = Phase::Falling;
        }
        step
    }

    /// Line-clear delay fired: collapse the flagged rows and spawn
    pub fn finish_line_clear(&mut self) -> Step {
        if self.state.phase != Phase::Clearing {
            return Step::unchanged();
        }
        let Some(pending) = self.pending_clear.take() else {
            return Step::unchanged();
        };

        let rows = std::mem::take(&mut self.state.clearing_lines);
        self.state.board.collapse(&rows);
        self.state.score += pending.points;
        self.state.lines_cleared += pending.lines;
        self.state.gravity_ms = gravity_interval_ms(self.state.lines_cleared);

        let mut step = Step::changed();
        if !self.state.paused {
            step.gravity = GravityAction::Start;
        }
        self.spawn_next(&mut step);
        step
    }

    /// Suspend gravity and the lock delay
    pub fn pause(&mut self) -> Step {
        if self.state.game_over || self.state.paused {
            return Step::unchanged();
        }
        self.state.paused = true;
        self.lock_pending = false;
        if self.state.phase == Phase::Locking {
            self.state.phase = Phase::Falling;
        }
        Step {
            lock_delay: TimerAction::Cancel,
            gravity: GravityAction::Stop,
            ..Step::changed()
        }
    }

    /// Leave pause; gravity restarts at the current speed
    pub fn resume(&mut self) -> Step {
        if !self.state.paused {
            return Step::unchanged();
        }
        self.state.paused = false;
        let mut step = Step::changed();
        if !self.state.game_over && self.state.phase != Phase::Clearing {
            step.gravity = GravityAction::Start;
        }
        step
    }

    /// Discard the game and deal a fresh one from a restarted bag
    pub fn restart(&mut self) -> Step {
        self.randomizer.restart();
        self.state = fresh_state(self.randomizer.as_mut());
        self.last_move_was_rotation = false;
        self.lock_pending = false;
        self.pending_clear = None;
        Step {
            lock_delay: TimerAction::Cancel,
            line_clear: TimerAction::Cancel,
            gravity: GravityAction::Start,
            ..Step::changed()
        }
    }

    /// Stamp the current piece and score the lock
    fn lock_current(&mut self, step: &mut Step) {
        let Some(piece) = self.state.current.take() else {
            return;
        };
        self.lock_pending = false;
        step.lock_delay = TimerAction::Cancel;

        let t_spin = piece.kind() == PieceKind::T
            && self.last_move_was_rotation
            && self.state.board.is_t_spin_pocket(&piece);
        self.last_move_was_rotation = false;

        if !self.state.board.lock_piece(&piece) {
            self.enter_game_over(step);
            return;
        }

        let rows = self.state.board.cleared_rows();
        let points = line_clear_score(rows.len(), t_spin);
        if rows.is_empty() {
            self.state.score += points;
            self.spawn_next(step);
            return;
        }

        self.pending_clear = Some(PendingClear {
            points,
            lines: rows.len() as u32,
        });
        self.state.clearing_lines = rows;
        self.state.phase = Phase::Clearing;
        self.state.ghost = None;
        step.line_clear = TimerAction::Arm;
        step.gravity = GravityAction::Stop;
    }

    /// Bring the next piece into play and draw a new next piece
    fn spawn_next(&mut self, step: &mut Step) {
        let entering = self.state.next.respawned();
        self.state.next = Piece::spawn(self.randomizer.draw());
        self.state.can_hold = true;
        self.enter_play(entering, step);
    }

    fn enter_play(&mut self, piece: Piece, step: &mut Step) {
        self.state.piece_id = self.state.piece_id.wrapping_add(1);
        self.last_move_was_rotation = false;
        if self.lock_pending {
            step.lock_delay = TimerAction::Cancel;
        }
        self.lock_pending = false;

        if !self.fits(&piece) {
            self.enter_game_over(step);
            return;
        }
        self.state.current = Some(piece);
        self.state.phase = Phase::Falling;
        self.state.refresh_ghost();
    }

    fn enter_game_over(&mut self, step: &mut Step) {
        if self.state.game_over {
            return;
        }
        self.state.current = None;
        self.state.ghost = None;
        self.state.game_over = true;
        self.state.phase = Phase::GameOver;
        self.lock_pending = false;
        step.lock_delay = TimerAction::Cancel;
        step.gravity = GravityAction::Stop;

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            step.save_high_score = Some(self.state.score);
        }
    }
}

fn fresh_state(randomizer: &mut dyn Randomizer) -> GameState {
    let current = Piece::spawn(randomizer.draw());
    let next = Piece::spawn(randomizer.draw());
    GameState::new(current, next)
}
