//! Per-frame simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic for a given input sequence:
//! - Tilt samples and the frame delta are the only inputs
//! - Stable phase order within a step
//! - No rendering, storage, or platform dependencies

pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;

pub use physics::{Tuning, integrate};
pub use state::{Ball, GameEvent, RunPhase, RunState};
pub use tick::{TickInput, tick};
