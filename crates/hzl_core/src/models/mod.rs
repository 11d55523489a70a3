//! Data models for Hazard Labeller.
//!
//! This module contains the core data structures used throughout the
//! application:
//! - Hazard interval records produced by flagging
//! - Per-video label collections for output
//! - The session phase enum

mod enums;
mod labels;

// Re-export all public types
pub use enums::SessionPhase;
pub use labels::{HazardInterval, LabelledVideo};
