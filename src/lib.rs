//! Falling-block rules engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetris_engine::{types,core,runtime}` and hosts the
//! console driver.

pub mod console;

pub use tetris_engine_core as core;
pub use tetris_engine_runtime as runtime;
pub use tetris_engine_types as types;
