//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Phase of the labelling session with respect to the current video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// The current video has not been handed to the player yet, or the
    /// last load attempt failed.
    Loading,
    /// The current video is loaded and flagging is possible.
    Ready,
    /// The last video in the list has been reached and a further
    /// advance was requested. Flagging on the current video still works.
    Exhausted,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Exhausted => write!(f, "exhausted"),
        }
    }
}
