//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

use crate::discovery::DEFAULT_VIDEO_EXTENSIONS;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Labelling behavior.
    #[serde(default)]
    pub labelling: LabellingSettings,
}

/// Path configuration for output and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// File the labelled hazard intervals are written to. Overridden by
    /// `--dest` on the command line.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Last folder the operator browsed for videos.
    #[serde(default)]
    pub last_folder: String,
}

fn default_output_file() -> String {
    "hazard_labels.json".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            logs_folder: default_logs_folder(),
            last_folder: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Also write logs to a rolling file under the logs folder.
    #[serde(default = "default_true")]
    pub file_logging: bool,

    /// Default level filter when RUST_LOG is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_logging: true,
            level: default_level(),
        }
    }
}

/// Labelling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabellingSettings {
    /// Hazard length in seconds of video time. The per-video default
    /// duration in frames is `round(frame_rate * hazard_duration_secs)`.
    #[serde(default = "default_hazard_duration")]
    pub hazard_duration_secs: f64,

    /// File extensions treated as video when scanning a folder.
    #[serde(default = "default_extensions")]
    pub video_extensions: Vec<String>,
}

fn default_hazard_duration() -> f64 {
    2.0
}

fn default_extensions() -> Vec<String> {
    DEFAULT_VIDEO_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LabellingSettings {
    fn default() -> Self {
        Self {
            hazard_duration_secs: default_hazard_duration(),
            video_extensions: default_extensions(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Labelling,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Labelling => "labelling",
        }
    }
}
