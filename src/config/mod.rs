//! Configuration module for the wall
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags in `main`. Values are clamped on load so the rest of
//! the application never sees an out-of-range frame rate or particle count.

pub mod wall;

pub use wall::{ConfigError, WallConfig};
