//! Application orchestration layer
//!
//! This module coordinates between input, domain, UI, and platform layers.
//! It owns the screen state and runs the frame loop.

pub mod clock;
pub mod controller;
pub mod state;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use controller::{AppError, RunSummary, ScreenController};
pub use state::{ScreenEvent, ScreenState, StateMachine};
