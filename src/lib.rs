//! MotiBeam wall: a fullscreen launcher for nine themed realms
//!
//! Layers mirror the binary's structure: `domain` is pure logic, `app` owns
//! the screen state and frame loop, `input` and `ui` sit at the edges, and
//! `platform` holds the Win32 window.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;

#[cfg(windows)]
pub mod platform;
