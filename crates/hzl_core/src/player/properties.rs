//! Video property detection via ffprobe.

use std::path::Path;
use std::process::Command;

use super::{PlayerError, VideoInfo};

/// Parse an ffprobe frame-rate fraction like "30000/1001" or "25/1".
///
/// Returns `None` for malformed input or a zero denominator.
pub fn parse_fps_fraction(value: &str) -> Option<f64> {
    let (num, denom) = match value.find('/') {
        Some(idx) => {
            let num: f64 = value[..idx].parse().ok()?;
            let denom: f64 = value[idx + 1..].parse().ok()?;
            (num, denom)
        }
        None => (value.parse().ok()?, 1.0),
    };

    if denom == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / denom)
}

/// Timestamp in milliseconds at which a frame starts displaying.
pub fn frame_to_time_ms(frame: u32, fps: f64) -> f64 {
    frame as f64 * 1000.0 / fps
}

/// Detect video properties from a file using ffprobe.
pub fn probe_properties(path: &Path) -> Result<VideoInfo, PlayerError> {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    tracing::debug!("[VideoProps] Probing: {}", filename);

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=r_frame_rate,nb_frames,duration,width,height",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| PlayerError::ProbeFailed(format!("ffprobe execution failed: {}", e)))?;

    if !output.status.success() {
        return Err(PlayerError::ProbeFailed(format!(
            "ffprobe exited with {}",
            output.status
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let data: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| PlayerError::ProbeFailed(format!("Failed to parse ffprobe JSON: {}", e)))?;

    let stream = data
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| PlayerError::ProbeFailed("No video streams found".to_string()))?;

    let mut info = VideoInfo::default();

    if let Some(r_frame_rate) = stream.get("r_frame_rate").and_then(|v| v.as_str()) {
        if let Some(fps) = parse_fps_fraction(r_frame_rate) {
            info.fps = fps;
            if let Some(idx) = r_frame_rate.find('/') {
                let num: u32 = r_frame_rate[..idx].parse().unwrap_or(24000);
                let denom: u32 = r_frame_rate[idx + 1..].parse().unwrap_or(1001);
                info.fps_fraction = (num, denom);
            }
        }
    }

    if let Some(width) = stream.get("width").and_then(|v| v.as_u64()) {
        info.width = width as u32;
    }
    if let Some(height) = stream.get("height").and_then(|v| v.as_u64()) {
        info.height = height as u32;
    }

    // Duration: stream first, then format (MKV often only has the latter)
    if let Some(duration) = stream.get("duration").and_then(|v| v.as_str()) {
        if duration != "N/A" {
            if let Ok(d) = duration.parse::<f64>() {
                info.duration_ms = d * 1000.0;
            }
        }
    }
    if info.duration_ms == 0.0 {
        if let Some(format_duration) = data
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|v| v.as_str())
        {
            if format_duration != "N/A" {
                if let Ok(d) = format_duration.parse::<f64>() {
                    info.duration_ms = d * 1000.0;
                }
            }
        }
    }

    if let Some(nb_frames) = stream.get("nb_frames").and_then(|v| v.as_str()) {
        if nb_frames != "N/A" {
            if let Ok(count) = nb_frames.parse::<u32>() {
                info.frame_count = count;
            }
        }
    }
    // Estimate frame count from duration if the container omits it
    if info.frame_count == 0 && info.duration_ms > 0.0 && info.fps > 0.0 {
        info.frame_count = (info.duration_ms * info.fps / 1000.0) as u32;
    }

    tracing::debug!(
        "[VideoProps] {}x{} @ {:.3} fps ({}/{}), {} frames, {:.0}ms",
        info.width,
        info.height,
        info.fps,
        info.fps_fraction.0,
        info.fps_fraction.1,
        info.frame_count,
        info.duration_ms
    );

    Ok(info)
}

/// Check if ffprobe is available.
pub fn is_ffprobe_available() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
