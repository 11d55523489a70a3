//! Results persistence.
//!
//! Accumulates per-video hazard records and writes them as pretty JSON,
//! atomically, every time a video is finished and at exit. The original
//! tool parsed an output destination but never wrote it; here the
//! destination actually receives the labels.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LabelledVideo;

/// Errors from writing the results file.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write results to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    SerializeFailed(#[from] serde_json::Error),
}

/// Persistent results state (saved to the destination file).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResultsState {
    /// Results format version.
    version: u32,
    /// Labelled videos in session order.
    videos: Vec<LabelledVideo>,
}

/// Accumulates labelled videos and persists them to a destination file.
#[derive(Debug)]
pub struct ResultsWriter {
    dest: PathBuf,
    videos: Vec<LabelledVideo>,
}

impl ResultsWriter {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            videos: Vec::new(),
        }
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Number of videos recorded so far.
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Record a finished video and rewrite the destination file.
    ///
    /// Videos with no flagged hazards are recorded too, so the output
    /// distinguishes "reviewed, nothing found" from "never reviewed".
    pub fn record(&mut self, video: LabelledVideo) -> Result<(), OutputError> {
        self.videos.push(video);
        self.write()
    }

    /// Write the accumulated results atomically (temp file + rename).
    pub fn write(&self) -> Result<(), OutputError> {
        self.write_with_current(None)
    }

    /// Write the accumulated results plus an in-progress snapshot of
    /// the video currently being labelled, so a crash or plain exit
    /// never loses flags that were not followed by an advance.
    pub fn write_with_current(&self, current: Option<&LabelledVideo>) -> Result<(), OutputError> {
        let mut videos = self.videos.clone();
        if let Some(current) = current {
            videos.push(current.clone());
        }

        let state = ResultsState { version: 1, videos };

        let json = serde_json::to_string_pretty(&state)?;

        let io_err = |source| OutputError::WriteFailed {
            path: self.dest.clone(),
            source,
        };

        if let Some(parent) = self.dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let temp_file = self.dest.with_extension("json.tmp");
        fs::write(&temp_file, &json).map_err(io_err)?;
        fs::rename(&temp_file, &self.dest).map_err(io_err)?;

        tracing::debug!(
            "Wrote {} labelled video(s) to {}",
            self.videos.len(),
            self.dest.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HazardInterval;
    use tempfile::tempdir;

    #[test]
    fn record_writes_pretty_json() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("labels.json");
        let mut writer = ResultsWriter::new(&dest);

        let mut video = LabelledVideo::new("/videos/a.mp4", 30.0);
        video.intervals.push(HazardInterval::new(100, 160, "1"));
        writer.record(video).unwrap();

        let content = fs::read_to_string(&dest).unwrap();
        assert!(content.contains("\"version\": 1"));
        assert!(content.contains("a.mp4"));
        assert!(content.contains("\"start_frame\": 100"));

        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["videos"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn record_accumulates_across_videos() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("labels.json");
        let mut writer = ResultsWriter::new(&dest);

        writer.record(LabelledVideo::new("/videos/a.mp4", 30.0)).unwrap();
        writer.record(LabelledVideo::new("/videos/b.mp4", 25.0)).unwrap();

        let content = fs::read_to_string(&dest).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["videos"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn snapshot_is_appended_without_being_recorded() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("labels.json");
        let mut writer = ResultsWriter::new(&dest);
        writer.record(LabelledVideo::new("/videos/a.mp4", 30.0)).unwrap();

        let mut current = LabelledVideo::new("/videos/b.mp4", 30.0);
        current.intervals.push(HazardInterval::new(10, 70, "3"));
        writer.write_with_current(Some(&current)).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(parsed["videos"].as_array().unwrap().len(), 2);
        // The snapshot was not retained by the writer
        assert_eq!(writer.len(), 1);
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("labels.json");
        let mut writer = ResultsWriter::new(&dest);
        writer.record(LabelledVideo::new("/videos/a.mp4", 30.0)).unwrap();

        assert!(!dest.with_extension("json.tmp").exists());
    }
}
