//! Domain logic and core data structures
//!
//! This module contains the pure rules of the wall: presentation state,
//! animation math, realm sessions and launcher selection. Nothing here
//! touches a display, a clock or the platform.

pub mod animation;
pub mod core;
pub mod launcher;
pub mod presentation;
pub mod realm;
