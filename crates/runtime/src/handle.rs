//! Public face of the runtime: spawning and the command handle

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actor::{Actor, Request};
use crate::config::RuntimeConfig;
use crate::core::{Engine, GameState};
use crate::settings::{Settings, SettingsStore};
use crate::types::Command;
use crate::RuntimeError;

/// A running game
pub struct GameRuntime {
    handle: GameHandle,
    task: JoinHandle<()>,
}

impl GameRuntime {
    /// Start a game on the bag described by `config`, seeded from it or
    /// from entropy.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: RuntimeConfig, store: Arc<dyn SettingsStore>) -> Self {
        let engine = Engine::new(config.piece_bag());
        Self::with_engine(engine, config, store)
    }

    /// Start the runtime around an existing engine
    pub fn with_engine(mut engine: Engine, config: RuntimeConfig, store: Arc<dyn SettingsStore>) -> Self {
        let settings = match store.load() {
            Ok(settings) => settings,
            Err(err) => {
                warn!("failed to load settings, using defaults: {}", err);
                Settings::default()
            }
        };
        engine.set_high_score(settings.high_score);
        info!(
            high_score = settings.high_score,
            seed = ?config.seed,
            bag_copies = config.bag_copies,
            "starting game runtime"
        );

        let (requests_tx, requests_rx) = mpsc::channel(config.command_buffer.max(1));
        let (state_tx, state_rx) = watch::channel(engine.state().clone());
        let (top_score_tx, top_score_rx) = watch::channel(engine.top_score());

        let actor = Actor::new(engine, config, requests_rx, state_tx, top_score_tx, store);
        let task = tokio::spawn(actor.run());

        Self {
            handle: GameHandle {
                requests: requests_tx,
                state: state_rx,
                top_score: top_score_rx,
                show_ghost_piece: settings.show_ghost_piece,
            },
            task,
        }
    }

    /// A cloneable handle for sending commands and reading state
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    /// Stop the actor, cancel its timers and wait for pending saves
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        // Already stopped if the send fails; the join below still reports panics.
        let _ = self.handle.requests.send(Request::Shutdown).await;
        self.task.await?;
        Ok(())
    }
}

/// Command and observation handle for a [`GameRuntime`]
#[derive(Debug, Clone)]
pub struct GameHandle {
    requests: mpsc::Sender<Request>,
    state: watch::Receiver<GameState>,
    top_score: watch::Receiver<u32>,
    show_ghost_piece: bool,
}

impl GameHandle {
    /// Queue a command for the engine
    pub async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.requests
            .send(Request::Command(command))
            .await
            .map_err(|_| RuntimeError::Closed)
    }

    /// Move by `dx` columns; anything other than ±1 is ignored
    pub async fn move_horizontal(&self, dx: i8) -> Result<(), RuntimeError> {
        match Command::horizontal(dx) {
            Some(command) => self.send(command).await,
            None => Ok(()),
        }
    }

    pub async fn soft_drop(&self) -> Result<(), RuntimeError> {
        self.send(Command::SoftDrop).await
    }

    pub async fn hard_drop(&self) -> Result<(), RuntimeError> {
        self.send(Command::HardDrop).await
    }

    pub async fn rotate(&self, clockwise: bool) -> Result<(), RuntimeError> {
        let command = if clockwise {
            Command::RotateCw
        } else {
            Command::RotateCcw
        };
        self.send(command).await
    }

    pub async fn hold(&self) -> Result<(), RuntimeError> {
        self.send(Command::Hold).await
    }

    pub async fn pause(&self) -> Result<(), RuntimeError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), RuntimeError> {
        self.send(Command::Resume).await
    }

    pub async fn restart(&self) -> Result<(), RuntimeError> {
        self.send(Command::Restart).await
    }

    /// Receiver notified on every committed state
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.clone()
    }

    /// Latest published state
    pub fn state(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Receiver of `max(persisted high score, current score)`
    pub fn top_score(&self) -> watch::Receiver<u32> {
        self.top_score.clone()
    }

    /// Ghost-piece preference read from settings at start
    pub fn show_ghost_piece(&self) -> bool {
        self.show_ghost_piece
    }
}
