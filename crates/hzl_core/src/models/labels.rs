//! Hazard interval records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single flagged hazard, recorded as a fixed-length frame interval.
///
/// The label is the stringified session-wide hazard counter at creation
/// time: unique per session, not per video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardInterval {
    /// Frame index at the moment of flagging.
    pub start_frame: u32,
    /// `start_frame` plus the default hazard duration of the video.
    pub end_frame: u32,
    /// Stringified hazard counter.
    pub label: String,
}

impl HazardInterval {
    pub fn new(start_frame: u32, end_frame: u32, label: impl Into<String>) -> Self {
        Self {
            start_frame,
            end_frame,
            label: label.into(),
        }
    }

    /// Interval length in frames.
    pub fn duration(&self) -> u32 {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

/// All hazards flagged on one video, collected for output when the
/// session moves past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledVideo {
    /// Path of the labelled video file.
    pub path: PathBuf,
    /// Frame rate the intervals were recorded against.
    pub frame_rate: f64,
    /// Flagged intervals in flagging order.
    pub intervals: Vec<HazardInterval>,
}

impl LabelledVideo {
    pub fn new(path: impl Into<PathBuf>, frame_rate: f64) -> Self {
        Self {
            path: path.into(),
            frame_rate,
            intervals: Vec::new(),
        }
    }
}
