//! Application state, messages, and the main window view.
//!
//! The GUI translates toolkit events into a small closed set of
//! controller intents (select videos, flag hazard, advance video) and
//! forwards them to the `hzl_core` session. Handler methods live in the
//! `handlers` modules as `impl App` blocks.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use iced::keyboard;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, progress_bar, row, slider, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};

use hzl_core::config::ConfigManager;
use hzl_core::output::ResultsWriter;
use hzl_core::player::{FfmpegPlayer, VideoInfo};
use hzl_core::session::{ProgressHandle, Session, TimelineHandle};

use crate::theme::{font, spacing};
use crate::widgets::timeline;

/// Startup data assembled in `main`.
#[derive(Clone)]
pub struct AppInit {
    pub config: Arc<Mutex<ConfigManager>>,
    /// Video list resolved from the command line, if selection flags
    /// were given.
    pub file_list: Option<Vec<PathBuf>>,
    /// Destination for the labelled intervals.
    pub dest: PathBuf,
}

/// Timeline collaborator: the flagged periods of the current video.
#[derive(Debug, Default)]
pub struct TimelineState {
    pub periods: Vec<(u32, u32, String)>,
}

impl TimelineHandle for TimelineState {
    fn add_period(&mut self, start_frame: u32, end_frame: u32, label: &str) {
        self.periods.push((start_frame, end_frame, label.to_string()));
    }

    fn clear(&mut self) {
        self.periods.clear();
    }
}

/// Progress collaborator: which video of how many is active.
#[derive(Debug, Default)]
pub struct ProgressState {
    pub current: usize,
    pub total: usize,
}

impl ProgressHandle for ProgressState {
    fn set_current(&mut self, current: usize, total: usize) {
        self.current = current;
        self.total = total;
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    BrowseVideos,
    BrowseFolder,
    FilesSelected(Vec<PathBuf>),
    FolderSelected(Option<PathBuf>),
    FlagHazard,
    AdvanceVideo,
    RetryLoad,
    PlayPause,
    Seek(u32),
    Tick,
    FrameDecoded(Option<Handle>),
}

/// Main application state.
pub struct App {
    pub config: Arc<Mutex<ConfigManager>>,
    pub player: Arc<Mutex<FfmpegPlayer>>,
    pub session: Option<Session>,
    pub timeline: TimelineState,
    pub progress: ProgressState,
    pub results: ResultsWriter,

    /// Single-line status surface.
    pub status: String,
    /// Properties of the loaded video, if any.
    pub video_info: Option<VideoInfo>,
    /// Decoded frame currently on screen.
    pub current_frame: Option<Handle>,
    /// A frame decode task is outstanding; skip further fetches until
    /// it lands.
    pub frame_in_flight: bool,
    pub is_playing: bool,
    /// Mirror of the player cursor for the slider and timeline.
    pub playhead: u32,
}

impl App {
    pub fn new(init: AppInit) -> (Self, Task<Message>) {
        let mut app = Self {
            config: init.config,
            player: Arc::new(Mutex::new(FfmpegPlayer::new())),
            session: None,
            timeline: TimelineState::default(),
            progress: ProgressState::default(),
            results: ResultsWriter::new(init.dest),
            status: String::new(),
            video_info: None,
            current_frame: None,
            frame_in_flight: false,
            is_playing: false,
            playhead: 0,
        };

        let task = match init.file_list {
            Some(file_list) => app.initialize_session(file_list),
            None => {
                app.status = "Select videos or a folder to begin".to_string();
                Task::none()
            }
        };

        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BrowseVideos => self.browse_videos(),
            Message::BrowseFolder => self.browse_folder(),
            Message::FilesSelected(paths) => self.handle_files_selected(paths),
            Message::FolderSelected(folder) => self.handle_folder_selected(folder),
            Message::FlagHazard => self.handle_flag_hazard(),
            Message::AdvanceVideo => self.handle_advance_video(),
            Message::RetryLoad => self.retry_load(),
            Message::PlayPause => self.handle_play_pause(),
            Message::Seek(frame) => self.handle_seek(frame),
            Message::Tick => self.handle_tick(),
            Message::FrameDecoded(handle) => self.handle_frame_decoded(handle),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::listen().filter_map(|event| match event {
            keyboard::Event::KeyPressed {
                key, modifiers, ..
            } => handle_key_press(key, modifiers),
            _ => None,
        });

        if self.is_playing {
            let fps = self
                .video_info
                .as_ref()
                .map(|i| i.fps)
                .filter(|fps| *fps > 1.0)
                .unwrap_or(25.0);
            let tick = iced::time::every(Duration::from_millis((1000.0 / fps) as u64))
                .map(|_| Message::Tick);
            Subscription::batch([keys, tick])
        } else {
            keys
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let frame_count = self
            .video_info
            .as_ref()
            .map(|i| i.frame_count)
            .unwrap_or(0);

        column![
            self.view_header(),
            self.view_player_surface(),
            self.view_controls(frame_count),
            self.view_actions(),
            timeline::view(&self.timeline.periods, frame_count, self.playhead),
            self.view_status_bar(),
        ]
        .spacing(spacing::MD)
        .padding(spacing::MD)
        .into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let current = self
            .session
            .as_ref()
            .map(|s| {
                s.current_path()
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| s.current_path().display().to_string())
            })
            .unwrap_or_else(|| "No video selected".to_string());

        row![
            button(text("Videos...")).on_press(Message::BrowseVideos),
            button(text("Folder...")).on_press(Message::BrowseFolder),
            text(current)
                .size(font::NORMAL)
                .color(crate::theme::colors::TEXT_SECONDARY),
        ]
        .spacing(spacing::SM)
        .align_y(Alignment::Center)
        .into()
    }

    fn view_player_surface(&self) -> Element<'_, Message> {
        let surface: Element<'_, Message> = match &self.current_frame {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .into(),
            None if self.video_info.is_some() => text("Loading frame...")
                .size(font::MD)
                .color(crate::theme::colors::TEXT_MUTED)
                .into(),
            // A session without a loaded video means the last load
            // failed; offer a manual retry of the same index.
            None if self.session.is_some() => column![
                text("Unable to select video")
                    .size(font::MD)
                    .color(crate::theme::colors::TEXT_MUTED),
                button(text("Retry")).on_press(Message::RetryLoad),
            ]
            .spacing(spacing::SM)
            .align_x(Alignment::Center)
            .into(),
            None => text("No video loaded")
                .size(font::MD)
                .color(crate::theme::colors::TEXT_MUTED)
                .into(),
        };

        container(surface)
            .width(Length::Fill)
            .height(Length::Fixed(400.0))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn view_controls(&self, frame_count: u32) -> Element<'_, Message> {
        // Degenerate 0..=0 ranges confuse the slider; keep it non-empty
        let last_frame = frame_count.saturating_sub(1).max(1);
        let loaded = self.video_info.is_some();

        row![
            button(text(if self.is_playing { "Pause" } else { "Play" }))
                .on_press_maybe(loaded.then_some(Message::PlayPause)),
            slider(0.0..=last_frame as f64, self.playhead as f64, |v| {
                Message::Seek(v as u32)
            })
            .width(Length::Fill),
            text(format!("{} / {}", self.playhead, frame_count)).size(font::SM),
        ]
        .spacing(spacing::SM)
        .align_y(Alignment::Center)
        .into()
    }

    fn view_actions(&self) -> Element<'_, Message> {
        row![
            button(text("Flag Hazard [H]")).on_press(Message::FlagHazard),
            button(text("Next Video [N]")).on_press(Message::AdvanceVideo),
        ]
        .spacing(spacing::SM)
        .into()
    }

    fn view_status_bar(&self) -> Element<'_, Message> {
        let (current, total) = (self.progress.current, self.progress.total);

        row![
            text("Status:").size(font::NORMAL),
            text(&self.status).size(font::NORMAL).width(Length::Fill),
            text(if total > 0 {
                format!("Video {} of {}", current, total)
            } else {
                String::new()
            })
            .size(font::NORMAL),
            progress_bar(0.0..=total.max(1) as f32, current as f32)
                .length(Length::Fixed(200.0)),
        ]
        .spacing(spacing::MD)
        .align_y(Alignment::Center)
        .into()
    }
}

/// Translate key presses into controller intents.
fn handle_key_press(
    key: keyboard::Key,
    _modifiers: keyboard::Modifiers,
) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Named(keyboard::key::Named::Space) => Some(Message::PlayPause),
        keyboard::Key::Character("h") | keyboard::Key::Character("H") => {
            Some(Message::FlagHazard)
        }
        keyboard::Key::Character("n") | keyboard::Key::Character("N") => {
            Some(Message::AdvanceVideo)
        }
        _ => None,
    }
}
