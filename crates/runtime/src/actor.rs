//! The single task that owns the engine
//!
//! Commands and timer fires arrive on channels and are applied one at a
//! time; every committed state is published on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::core::{Engine, GameState, GravityAction, Step, TimerAction};
use crate::settings::SettingsStore;
use crate::timers::{TimerFire, TimerKind, Timers};
use crate::types::Command;

/// Message to the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Request {
    Command(Command),
    Shutdown,
}

pub(crate) struct Actor {
    engine: Engine,
    config: RuntimeConfig,
    timers: Timers,
    fires: mpsc::UnboundedReceiver<TimerFire>,
    requests: mpsc::Receiver<Request>,
    state_tx: watch::Sender<GameState>,
    top_score_tx: watch::Sender<u32>,
    store: Arc<dyn SettingsStore>,
    saves: Vec<JoinHandle<()>>,
}

impl Actor {
    pub fn new(
        engine: Engine,
        config: RuntimeConfig,
        requests: mpsc::Receiver<Request>,
        state_tx: watch::Sender<GameState>,
        top_score_tx: watch::Sender<u32>,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        let gravity = gravity_period(engine.state());
        let (timers, fires) = Timers::new(gravity);
        Self {
            engine,
            config,
            timers,
            fires,
            requests,
            state_tx,
            top_score_tx,
            store,
            saves: Vec::new(),
        }
    }

    pub async fn run(mut self) {
        if self.engine.state().playable() {
            self.timers.start_gravity(gravity_period(self.engine.state()));
        }
        self.publish();

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(Request::Command(command)) => self.handle_command(command),
                    Some(Request::Shutdown) | None => break,
                },
                Some(fire) = self.fires.recv() => self.handle_fire(fire),
            }
        }

        self.timers.cancel_all();
        for save in self.saves.drain(..) {
            if let Err(err) = save.await {
                warn!("high score save task failed: {}", err);
            }
        }
        debug!("game actor stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let step = self.engine.apply(command);
        if step.changed {
            if command.is_piece_command() {
                debug!(command = command.as_str(), "command accepted");
            } else {
                info!(command = command.as_str(), "game control applied");
            }
        }
        self.apply(step);
    }

    fn handle_fire(&mut self, fire: TimerFire) {
        if !self.timers.accept(fire) {
            debug!(?fire, "stale timer fire ignored");
            return;
        }
        let step = match fire.kind {
            TimerKind::Gravity => self.engine.gravity_tick(),
            TimerKind::LockDelay => self.engine.lock_delay_expired(),
            TimerKind::LineClear => self.engine.finish_line_clear(),
        };
        if step.changed {
            debug!(timer = ?fire.kind, "timer applied");
        }
        self.apply(step);
    }

    /// Carry out the effects of a transition
    fn apply(&mut self, step: Step) {
        match step.lock_delay {
            TimerAction::Arm => self.timers.arm(TimerKind::LockDelay, self.config.lock_delay),
            TimerAction::Cancel => self.timers.cancel(TimerKind::LockDelay),
            TimerAction::Keep => {}
        }
        match step.line_clear {
            TimerAction::Arm => self
                .timers
                .arm(TimerKind::LineClear, self.config.line_clear_delay),
            TimerAction::Cancel => self.timers.cancel(TimerKind::LineClear),
            TimerAction::Keep => {}
        }

        let period = gravity_period(self.engine.state());
        match step.gravity {
            GravityAction::Start => self.timers.start_gravity(period),
            GravityAction::Stop => self.timers.cancel(TimerKind::Gravity),
            GravityAction::Keep => self.timers.set_gravity_interval(period),
        }

        if let Some(score) = step.save_high_score {
            self.save_high_score(score);
        }
        if step.changed {
            if self.engine.state().game_over {
                info!(score = self.engine.state().score, "game over");
            }
            self.publish();
        }
    }

    fn save_high_score(&mut self, score: u32) {
        let store = Arc::clone(&self.store);
        self.saves.retain(|save| !save.is_finished());
        self.saves.push(tokio::task::spawn_blocking(move || {
            if let Err(err) = store.save_high_score(score) {
                warn!(score, "failed to save high score: {}", err);
            }
        }));
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.engine.state().clone());
        let top = self.engine.top_score();
        self.top_score_tx.send_if_modified(|current| {
            if *current == top {
                return false;
            }
            *current = top;
            true
        });
    }
}

fn gravity_period(state: &GameState) -> Duration {
    Duration::from_millis(state.gravity_ms as u64)
}
