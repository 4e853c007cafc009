//! omni-dashboard library root.
//!
//! View state, text rendering and configuration for the `omni` binary,
//! exposed as a library so integration tests can drive them directly.

pub mod config;
pub mod error;
pub mod state;
pub mod views;
