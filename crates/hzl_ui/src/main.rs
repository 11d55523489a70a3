//! Hazard Labeller - Main entry point
//!
//! Handles:
//! - Command line parsing
//! - Configuration loading
//! - Application-level logging initialization
//! - Video list resolution
//! - Application launch

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use hzl_core::config::ConfigManager;
use hzl_core::discovery::resolve_file_list;
use hzl_core::logging::{init_tracing, init_tracing_with_file, LogLevel};

mod app;
mod handlers;
mod theme;
mod widgets;

use app::{App, AppInit};

#[derive(Debug, Parser)]
#[command(name = "hazard-labeller", about = "Manual hazard labelling for dashcam videos")]
struct Args {
    /// Explicit list of video files to label.
    #[arg(long = "filepath", value_name = "FILE", num_args = 1..)]
    filepath: Vec<PathBuf>,

    /// Folder to scan recursively for video files. Takes precedence
    /// over --filepath when both are given.
    #[arg(long, value_name = "DIR")]
    folder: Option<PathBuf>,

    /// Destination file for the labelled hazard intervals. Defaults to
    /// the configured output file.
    #[arg(long, value_name = "FILE")]
    dest: Option<PathBuf>,
}

/// Default config path: .config/settings.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

fn main() -> iced::Result {
    let args = Args::parse();

    // Load configuration first (needed for logs directory path)
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    // Initialize application-level logging
    let level = LogLevel::from_str_or_default(&config_manager.settings().logging.level);
    let _log_guard = if config_manager.settings().logging.file_logging {
        if let Err(e) = config_manager.ensure_dirs_exist() {
            eprintln!("Warning: Failed to create directories: {}", e);
        }
        init_tracing_with_file(level, &config_manager.logs_folder())
    } else {
        init_tracing(level);
        None
    };

    tracing::info!("Hazard Labeller starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", hzl_core::version());

    // Resolve the video list up front when selection flags were given;
    // a flag that resolves to nothing is a fatal configuration error.
    let file_list = if args.folder.is_some() || !args.filepath.is_empty() {
        let extensions = config_manager.settings().labelling.video_extensions.clone();
        match resolve_file_list(&args.filepath, args.folder.as_deref(), &extensions) {
            Ok(list) => Some(list),
            Err(e) => {
                tracing::error!("{}", e);
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        None
    };

    let dest = args.dest.unwrap_or_else(|| config_manager.output_file());
    tracing::info!("Labels will be written to {}", dest.display());

    let init = AppInit {
        config: Arc::new(Mutex::new(config_manager)),
        file_list,
        dest,
    };

    iced::application(move || App::new(init.clone()), App::update, App::view)
        .title("Hazard Labelling")
        .theme(App::theme)
        .subscription(App::subscription)
        .run()
}
