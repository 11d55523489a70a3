//! Playback handlers: play/pause, ticking, scrubbing, frame display.
//!
//! Frame decoding shells out to ffmpeg, so it runs on a blocking task
//! and lands back as a `FrameDecoded` message. At most one decode is in
//! flight; ticks that arrive while one is outstanding just move the
//! playhead.

use iced::widget::image::Handle;
use iced::Task;

use hzl_core::player::PlayerHandle;

use crate::app::{App, Message};

impl App {
    pub fn handle_play_pause(&mut self) -> Task<Message> {
        if self.video_info.is_none() {
            return Task::none();
        }

        let playing = {
            let mut player = self.player.lock().unwrap();
            if player.is_playing() {
                player.pause();
            } else {
                player.play();
            }
            player.is_playing()
        };

        self.is_playing = playing;
        Task::none()
    }

    pub fn handle_tick(&mut self) -> Task<Message> {
        let (playhead, playing) = {
            let mut player = self.player.lock().unwrap();
            if !player.is_playing() {
                return Task::none();
            }
            player.step_forward();
            (
                player.current_frame_index().unwrap_or(self.playhead),
                player.is_playing(),
            )
        };

        self.playhead = playhead;
        self.is_playing = playing;
        self.fetch_current_frame()
    }

    pub fn handle_seek(&mut self, frame: u32) -> Task<Message> {
        if self.video_info.is_none() {
            return Task::none();
        }

        let playhead = {
            let mut player = self.player.lock().unwrap();
            player.seek(frame);
            player.current_frame_index().unwrap_or(frame)
        };

        self.playhead = playhead;
        self.fetch_current_frame()
    }

    /// Decode the frame at the playhead on a blocking task.
    pub fn fetch_current_frame(&mut self) -> Task<Message> {
        if self.frame_in_flight || self.video_info.is_none() {
            return Task::none();
        }

        self.frame_in_flight = true;
        let player = self.player.clone();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    let frame = {
                        let player = player.lock().unwrap();
                        player.frame_at_cursor()
                    };
                    match frame {
                        Ok(image) => {
                            let rgba = image.to_rgba8();
                            let (width, height) = rgba.dimensions();
                            Some(Handle::from_rgba(width, height, rgba.into_raw()))
                        }
                        Err(e) => {
                            tracing::warn!("Frame decode failed: {}", e);
                            None
                        }
                    }
                })
                .await
                .ok()
                .flatten()
            },
            Message::FrameDecoded,
        )
    }

    pub fn handle_frame_decoded(&mut self, handle: Option<Handle>) -> Task<Message> {
        self.frame_in_flight = false;
        if let Some(handle) = handle {
            self.current_frame = Some(handle);
        }
        Task::none()
    }
}
