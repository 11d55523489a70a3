//! Labelling session state and controller operations.
//!
//! The session is a plain data structure owned by the GUI layer; every
//! operation takes the collaborators it talks to (player, timeline,
//! progress indicator) as explicit arguments, so the whole state machine
//! is testable without a toolkit.

mod controller;
mod handles;

pub use controller::{AdvanceOutcome, FlaggedHazard, Session, DEFAULT_HAZARD_DURATION_SECS};
pub use handles::{ProgressHandle, TimelineHandle};
