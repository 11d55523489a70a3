//! HZL Core - Backend logic for Hazard Labeller
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by the GUI application or a CLI tool.

pub mod config;
pub mod discovery;
pub mod errors;
pub mod logging;
pub mod models;
pub mod output;
pub mod player;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
