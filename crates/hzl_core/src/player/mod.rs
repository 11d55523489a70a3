//! Video player backend.
//!
//! Provides the player contract the labelling session drives, plus an
//! FFmpeg subprocess implementation for probing and frame access.
//! Decoding and rendering correctness are ffmpeg's problem; this module
//! only shells out and tracks a frame cursor.

mod ffmpeg;
mod properties;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ffmpeg::FfmpegPlayer;
pub use properties::{
    frame_to_time_ms, is_ffprobe_available, parse_fps_fraction, probe_properties,
};

/// Properties of an opened video, probed via ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// Frame rate (e.g. 29.97).
    pub fps: f64,
    /// Frame rate as the exact fraction reported by ffprobe.
    pub fps_fraction: (u32, u32),
    /// Total frame count; estimated from duration when the container
    /// does not carry it.
    pub frame_count: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Duration in milliseconds.
    pub duration_ms: f64,
}

impl Default for VideoInfo {
    fn default() -> Self {
        Self {
            fps: 23.976,
            fps_fraction: (24000, 1001),
            frame_count: 0,
            width: 0,
            height: 0,
            duration_ms: 0.0,
        }
    }
}

/// Errors from player operations.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Failed to open a video file.
    #[error("Failed to open video '{path}': {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// ffprobe property detection failed.
    #[error("Failed to probe video properties: {0}")]
    ProbeFailed(String),

    /// Reading a frame or the playback position failed. Transient:
    /// callers may refresh the player and retry.
    #[error("Failed to read frame {frame}: {message}")]
    FrameRead { frame: u32, message: String },

    /// No video is currently loaded.
    #[error("No video loaded")]
    NotLoaded,

    /// FFmpeg binaries are not installed or not executable.
    #[error("ffmpeg not found or not executable")]
    FfmpegMissing,
}

impl PlayerError {
    /// Create an open failed error.
    pub fn open_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a frame read error.
    pub fn frame_read(frame: u32, message: impl Into<String>) -> Self {
        Self::FrameRead {
            frame,
            message: message.into(),
        }
    }

    /// Create a not loaded error.
    pub fn not_loaded() -> Self {
        Self::NotLoaded
    }
}

/// Contract between the labelling session and the video player.
///
/// `current_frame_index` and `refresh` are fallible so the session can
/// apply its read-retry policy; `FrameRead` failures are transient while
/// `OpenFailed`/`ProbeFailed` are load failures.
pub trait PlayerHandle {
    /// Open a video file and report its properties.
    fn open(&mut self, path: &Path) -> Result<VideoInfo, PlayerError>;

    /// Frame index currently at the playhead.
    fn current_frame_index(&mut self) -> Result<u32, PlayerError>;

    /// Frame rate of the loaded video, 0.0 when nothing is loaded.
    fn frame_rate(&self) -> f64;

    /// Stop playback and rewind.
    fn stop(&mut self);

    /// Re-synchronize internal state with the underlying file, e.g.
    /// after a failed position read.
    fn refresh(&mut self) -> Result<(), PlayerError>;
}
