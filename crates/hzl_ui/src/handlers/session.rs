//! Session intent handlers.
//!
//! Routes the SelectVideo / FlagHazard / AdvanceVideo intents into the
//! core session and surfaces the resulting status text. The double
//! frame-read failure is the one fatal runtime path: status is set,
//! results are flushed, and the process terminates.

use std::path::PathBuf;

use iced::Task;

use hzl_core::models::LabelledVideo;
use hzl_core::session::{AdvanceOutcome, ProgressHandle, Session, TimelineHandle};

use crate::app::{App, Message};

impl App {
    /// Build a session over a resolved video list and load the first
    /// video.
    pub fn initialize_session(&mut self, file_list: Vec<PathBuf>) -> Task<Message> {
        let hazard_duration_secs = {
            let cfg = self.config.lock().unwrap();
            cfg.settings().labelling.hazard_duration_secs
        };
        let total = file_list.len();

        let mut session = match Session::new(file_list, hazard_duration_secs) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Failed to create session: {}", e);
                self.status = e.to_string();
                return Task::none();
            }
        };

        self.timeline.clear();
        self.progress.set_current(1, total);
        self.playhead = 0;
        self.current_frame = None;
        self.is_playing = false;

        let load = {
            let mut player = self.player.lock().unwrap();
            session.load_current_video(&mut *player)
        };

        match load {
            Ok(info) => {
                self.video_info = Some(info);
                self.status.clear();
            }
            Err(e) => {
                self.video_info = None;
                self.status = e.to_string();
            }
        }

        self.session = Some(session);
        self.fetch_current_frame()
    }

    /// Retry loading the current video after a failed load.
    pub fn retry_load(&mut self) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };

        let load = {
            let mut player = self.player.lock().unwrap();
            session.load_current_video(&mut *player)
        };

        match load {
            Ok(info) => {
                self.video_info = Some(info);
                self.status.clear();
                self.playhead = 0;
                self.fetch_current_frame()
            }
            Err(e) => {
                self.status = e.to_string();
                Task::none()
            }
        }
    }

    /// Flag a hazard at the current playback position.
    pub fn handle_flag_hazard(&mut self) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };

        let flagged = {
            let mut player = self.player.lock().unwrap();
            session.flag_hazard(&mut *player, &mut self.timeline)
        };

        match flagged {
            Ok(Some(flagged)) => {
                // Keep the output file current so an exit without a
                // final advance loses nothing.
                let snapshot = session.current_labels();
                if let Err(e) = self.results.write_with_current(Some(&snapshot)) {
                    tracing::warn!("Failed to write labels: {}", e);
                }
                self.status = flagged.status;
            }
            Ok(None) => {
                // Flagging before a video is ready is silently ignored
            }
            Err(e) => {
                self.status = e.to_string();
                tracing::error!("{}", e);
                if e.is_fatal() {
                    self.flush_and_abort();
                }
            }
        }

        Task::none()
    }

    /// Advance to the next video in the list.
    pub fn handle_advance_video(&mut self) -> Task<Message> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };

        let outcome = {
            let mut player = self.player.lock().unwrap();
            session.advance_to_next_video(&mut *player, &mut self.timeline, &mut self.progress)
        };

        match outcome {
            AdvanceOutcome::Exhausted => {
                self.status = "No more videos".to_string();
                Task::none()
            }
            AdvanceOutcome::Advanced { finished, info } => {
                self.record_finished(finished);
                self.status.clear();
                self.video_info = Some(info);
                self.playhead = 0;
                self.current_frame = None;
                self.is_playing = false;
                self.fetch_current_frame()
            }
            AdvanceOutcome::AdvanceFailed { finished, error } => {
                self.record_finished(finished);
                self.status = error.to_string();
                self.video_info = None;
                self.playhead = 0;
                self.current_frame = None;
                self.is_playing = false;
                Task::none()
            }
        }
    }

    /// Record a finished video in the results file.
    fn record_finished(&mut self, finished: LabelledVideo) {
        if let Err(e) = self.results.record(finished) {
            tracing::warn!("Failed to write labels: {}", e);
            self.status = format!("Warning: {}", e);
        }
    }

    /// Flush outstanding labels and terminate after an unrecoverable
    /// player failure.
    fn flush_and_abort(&mut self) -> ! {
        if let Some(session) = self.session.as_mut() {
            let last = session.take_current_labels();
            if !last.intervals.is_empty() {
                if let Err(e) = self.results.record(last) {
                    tracing::warn!("Failed to flush labels: {}", e);
                }
            }
        }
        eprintln!("Unable to label, exiting...");
        std::process::exit(1);
    }
}
