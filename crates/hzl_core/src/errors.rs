//! Error types for the labelling session.
//!
//! Non-fatal errors are rendered as status text by the GUI; only
//! `FrameReadExhausted` is allowed to terminate the process, and only
//! from the binary.

use std::path::PathBuf;

use thiserror::Error;

use crate::player::PlayerError;

/// Errors from session construction and controller operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The resolved video list was empty. Fatal at startup.
    #[error("No video files to label")]
    EmptyFileList,

    /// The player could not open the current video. Recoverable: the
    /// session stays on the same index and the message is surfaced.
    #[error("Unable to select video")]
    VideoLoad {
        path: PathBuf,
        #[source]
        source: PlayerError,
    },

    /// Reading the playback position failed twice (once after a player
    /// refresh). The one fatal runtime error.
    #[error("Unable to label, exiting...")]
    FrameReadExhausted {
        #[source]
        source: PlayerError,
    },
}

impl SessionError {
    /// Create a video load error.
    pub fn video_load(path: impl Into<PathBuf>, source: PlayerError) -> Self {
        Self::VideoLoad {
            path: path.into(),
            source,
        }
    }

    /// Create a frame read exhausted error.
    pub fn frame_read_exhausted(source: PlayerError) -> Self {
        Self::FrameReadExhausted { source }
    }

    /// Whether this error must terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::EmptyFileList | SessionError::FrameReadExhausted { .. }
        )
    }
}

/// Errors from resolving the input video list.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A file named on the command line does not exist.
    #[error("Video file not found: {0}")]
    FileNotFound(PathBuf),

    /// The scan folder does not exist or is not a directory.
    #[error("Folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// I/O error while walking a folder.
    #[error("Failed to scan {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan produced no video files.
    #[error("No video files found in {0}")]
    NoVideosFound(PathBuf),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
