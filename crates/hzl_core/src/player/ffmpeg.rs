//! FFmpeg subprocess-based player.
//!
//! Extracts single frames as PNG on stdout and tracks the playhead as a
//! frame cursor. The GUI drives playback by stepping the cursor on a
//! timer and displaying the decoded frames.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;

use super::properties::{frame_to_time_ms, probe_properties};
use super::{PlayerError, PlayerHandle, VideoInfo};

/// FFmpeg subprocess-based video player.
pub struct FfmpegPlayer {
    path: Option<PathBuf>,
    info: Option<VideoInfo>,
    cursor: u32,
    playing: bool,
}

impl FfmpegPlayer {
    pub fn new() -> Self {
        Self {
            path: None,
            info: None,
            cursor: 0,
            playing: false,
        }
    }

    /// Check if the ffmpeg binary is available.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Properties of the loaded video, if any.
    pub fn info(&self) -> Option<&VideoInfo> {
        self.info.as_ref()
    }

    /// Path of the loaded video, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        if self.info.is_some() {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Move the playhead to a frame, clamped to the video length.
    pub fn seek(&mut self, frame: u32) {
        let last = self
            .info
            .as_ref()
            .map(|i| i.frame_count.saturating_sub(1))
            .unwrap_or(0);
        self.cursor = frame.min(last);
    }

    /// Step the playhead forward one frame. Pauses at the end.
    pub fn step_forward(&mut self) {
        let Some(info) = self.info.as_ref() else {
            return;
        };
        if self.cursor + 1 < info.frame_count {
            self.cursor += 1;
        } else {
            self.playing = false;
        }
    }

    /// Decode the frame at the playhead for display.
    pub fn frame_at_cursor(&self) -> Result<DynamicImage, PlayerError> {
        self.decode_frame(self.cursor)
    }

    /// Decode a single frame by index via ffmpeg.
    pub fn decode_frame(&self, frame: u32) -> Result<DynamicImage, PlayerError> {
        let info = self.info.as_ref().ok_or_else(PlayerError::not_loaded)?;
        let path = self.path.as_ref().ok_or_else(PlayerError::not_loaded)?;

        let time_secs = frame_to_time_ms(frame, info.fps) / 1000.0;
        let hours = (time_secs / 3600.0) as u32;
        let minutes = ((time_secs % 3600.0) / 60.0) as u32;
        let seconds = time_secs % 60.0;
        let time_str = format!("{:02}:{:02}:{:06.3}", hours, minutes, seconds);

        tracing::trace!("[FfmpegPlayer] Extracting frame {} at {}", frame, time_str);

        let output = Command::new("ffmpeg")
            .args([
                "-ss",
                &time_str,
                "-i",
                path.to_str().unwrap_or(""),
                "-vframes",
                "1",
                "-f",
                "image2pipe",
                "-vcodec",
                "png",
                "-",
            ])
            .output()
            .map_err(|e| PlayerError::frame_read(frame, format!("ffmpeg execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlayerError::frame_read(
                frame,
                format!(
                    "ffmpeg failed: {}",
                    stderr.lines().last().unwrap_or("unknown error")
                ),
            ));
        }

        if output.stdout.is_empty() {
            return Err(PlayerError::frame_read(frame, "ffmpeg produced no output"));
        }

        let cursor = Cursor::new(output.stdout);
        image::load(cursor, image::ImageFormat::Png)
            .map_err(|e| PlayerError::frame_read(frame, format!("Failed to decode PNG: {}", e)))
    }
}

impl Default for FfmpegPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerHandle for FfmpegPlayer {
    fn open(&mut self, path: &Path) -> Result<VideoInfo, PlayerError> {
        if !Self::is_available() {
            return Err(PlayerError::FfmpegMissing);
        }
        if !path.exists() {
            return Err(PlayerError::open_failed(path, "File does not exist"));
        }

        let info = probe_properties(path)
            .map_err(|e| PlayerError::open_failed(path, e.to_string()))?;

        tracing::info!(
            "[FfmpegPlayer] Opened {}: {}x{} @ {:.3} fps, {} frames",
            path.display(),
            info.width,
            info.height,
            info.fps,
            info.frame_count
        );

        self.path = Some(path.to_path_buf());
        self.info = Some(info.clone());
        self.cursor = 0;
        self.playing = false;
        Ok(info)
    }

    fn current_frame_index(&mut self) -> Result<u32, PlayerError> {
        if self.info.is_none() {
            return Err(PlayerError::not_loaded());
        }
        Ok(self.cursor)
    }

    fn frame_rate(&self) -> f64 {
        self.info.as_ref().map(|i| i.fps).unwrap_or(0.0)
    }

    fn stop(&mut self) {
        self.playing = false;
        self.cursor = 0;
    }

    fn refresh(&mut self) -> Result<(), PlayerError> {
        let path = self.path.clone().ok_or_else(PlayerError::not_loaded)?;
        let info = probe_properties(&path)?;
        if self.cursor >= info.frame_count {
            self.cursor = info.frame_count.saturating_sub(1);
        }
        self.info = Some(info);
        Ok(())
    }
}
