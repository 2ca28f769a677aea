//! Timing runtime for the rules engine.
//!
//! The core engine is a pure state machine; this crate gives it a clock.
//! A [`GameRuntime`] spawns one tokio task that owns the [`Engine`], so every
//! transition is serialized. Around it sit three cancellable timers:
//!
//! - **Gravity**: a ticker that re-reads its interval every cycle
//! - **Lock delay**: one-shot, armed when the piece is grounded
//! - **Line clear**: one-shot, defers the row collapse
//!
//! Observers read snapshots from a `watch` channel. The high score is read
//! from a [`SettingsStore`] at start and written back on game over from a
//! blocking task.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tetris_engine_runtime::{GameRuntime, MemorySettings, RuntimeConfig};
//!
//! # async fn demo() -> Result<(), tetris_engine_runtime::RuntimeError> {
//! let runtime = GameRuntime::spawn(RuntimeConfig::default(), Arc::new(MemorySettings::default()));
//! let handle = runtime.handle();
//!
//! handle.rotate(true).await?;
//! handle.hard_drop().await?;
//! println!("score: {}", handle.state().score);
//!
//! runtime.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Engine`]: tetris_engine_core::Engine

mod actor;
pub mod config;
mod handle;
pub mod settings;
mod timers;

pub use tetris_engine_core as core;
pub use tetris_engine_types as types;

pub use config::RuntimeConfig;
pub use handle::{GameHandle, GameRuntime};
pub use settings::{JsonFileSettings, MemorySettings, Settings, SettingsError, SettingsStore};

/// Errors from the runtime handle
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The actor task is gone
    #[error("game runtime has shut down")]
    Closed,

    #[error("game task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
