//! The session state machine.

use std::path::{Path, PathBuf};

use crate::errors::{SessionError, SessionResult};
use crate::models::{HazardInterval, LabelledVideo, SessionPhase};
use crate::player::{PlayerHandle, VideoInfo};

use super::handles::{ProgressHandle, TimelineHandle};

/// Default hazard length in seconds of video time.
pub const DEFAULT_HAZARD_DURATION_SECS: f64 = 2.0;

/// A successfully flagged hazard plus the status line describing it.
#[derive(Debug, Clone)]
pub struct FlaggedHazard {
    pub interval: HazardInterval,
    pub status: String,
}

/// Result of an advance request.
#[derive(Debug)]
pub enum AdvanceOutcome {
    /// Already at the last video; nothing was mutated. Surfaced as
    /// "No more videos".
    Exhausted,
    /// Moved to the next video and loaded it. `finished` carries the
    /// labels of the video just left, for persistence.
    Advanced {
        finished: LabelledVideo,
        info: VideoInfo,
    },
    /// Moved to the next video but loading it failed; the session stays
    /// in `Loading` on the new index and the error is surfaced as
    /// status text.
    AdvanceFailed {
        finished: LabelledVideo,
        error: SessionError,
    },
}

/// State of one labelling session over an ordered list of videos.
///
/// The hazard counter spans the whole session: labels keep counting
/// across video boundaries even though the timeline is cleared between
/// videos. Matches the original tool's numbering.
#[derive(Debug)]
pub struct Session {
    file_list: Vec<PathBuf>,
    current_index: usize,
    hazard_counter: u64,
    video_loaded: bool,
    exhausted: bool,
    /// Frames a flagged hazard spans, recomputed on every load.
    hazard_default_duration: u32,
    hazard_duration_secs: f64,
    /// Frame rate of the loaded video, cached for output records.
    frame_rate: f64,
    /// Intervals flagged on the current video, in flagging order.
    intervals: Vec<HazardInterval>,
}

impl Session {
    /// Create a session over a resolved, non-empty video list.
    pub fn new(file_list: Vec<PathBuf>, hazard_duration_secs: f64) -> SessionResult<Self> {
        if file_list.is_empty() {
            return Err(SessionError::EmptyFileList);
        }

        tracing::info!("Session created with {} video(s)", file_list.len());

        Ok(Self {
            file_list,
            current_index: 0,
            hazard_counter: 0,
            video_loaded: false,
            exhausted: false,
            hazard_default_duration: 0,
            hazard_duration_secs,
            frame_rate: 0.0,
            intervals: Vec::new(),
        })
    }

    pub fn file_list(&self) -> &[PathBuf] {
        &self.file_list
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Path of the video at the current index.
    pub fn current_path(&self) -> &Path {
        &self.file_list[self.current_index]
    }

    pub fn hazard_counter(&self) -> u64 {
        self.hazard_counter
    }

    pub fn video_loaded(&self) -> bool {
        self.video_loaded
    }

    pub fn hazard_default_duration(&self) -> u32 {
        self.hazard_default_duration
    }

    /// Intervals flagged on the current video so far.
    pub fn intervals(&self) -> &[HazardInterval] {
        &self.intervals
    }

    pub fn phase(&self) -> SessionPhase {
        if self.exhausted {
            SessionPhase::Exhausted
        } else if self.video_loaded {
            SessionPhase::Ready
        } else {
            SessionPhase::Loading
        }
    }

    /// Hand the current video to the player.
    ///
    /// On success the default hazard duration is recomputed from the
    /// reported frame rate. On failure the session stays on the same
    /// index with `video_loaded == false`; the caller surfaces the
    /// error as status text and may retry by calling again.
    pub fn load_current_video(
        &mut self,
        player: &mut dyn PlayerHandle,
    ) -> SessionResult<VideoInfo> {
        let path = self.file_list[self.current_index].clone();

        match player.open(&path) {
            Ok(info) => {
                self.video_loaded = true;
                self.frame_rate = info.fps;
                self.hazard_default_duration =
                    (info.fps * self.hazard_duration_secs).round() as u32;

                tracing::info!(
                    "Loaded video {} of {}: {} ({:.3} fps, default hazard {} frames)",
                    self.current_index + 1,
                    self.file_list.len(),
                    path.display(),
                    info.fps,
                    self.hazard_default_duration
                );

                Ok(info)
            }
            Err(e) => {
                self.video_loaded = false;
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                Err(SessionError::video_load(path, e))
            }
        }
    }

    /// Flag a hazard at the current playback position.
    ///
    /// A no-op (`Ok(None)`) before a video is loaded. A failed position
    /// read is retried exactly once after a player refresh; a second
    /// failure is fatal and the caller is expected to terminate the
    /// process after surfacing the error.
    pub fn flag_hazard(
        &mut self,
        player: &mut dyn PlayerHandle,
        timeline: &mut dyn TimelineHandle,
    ) -> SessionResult<Option<FlaggedHazard>> {
        if !self.video_loaded {
            tracing::debug!("Flag ignored: no video loaded");
            return Ok(None);
        }

        let frame = match player.current_frame_index() {
            Ok(frame) => frame,
            Err(first) => {
                tracing::warn!("Position read failed ({}), refreshing player", first);
                if let Err(e) = player.refresh() {
                    return Err(SessionError::frame_read_exhausted(e));
                }
                match player.current_frame_index() {
                    Ok(frame) => frame,
                    Err(second) => {
                        return Err(SessionError::frame_read_exhausted(second));
                    }
                }
            }
        };

        let rate = player.frame_rate();
        self.hazard_counter += 1;

        let interval = HazardInterval::new(
            frame,
            frame + self.hazard_default_duration,
            self.hazard_counter.to_string(),
        );
        timeline.add_period(interval.start_frame, interval.end_frame, &interval.label);
        self.intervals.push(interval.clone());

        let status = format!(
            "Hazard flagged! | Frame: {} Timestamp: {:.3}",
            frame,
            frame as f64 / rate
        );
        tracing::info!("{}", status);

        Ok(Some(FlaggedHazard { interval, status }))
    }

    /// Move to the next video in the list.
    ///
    /// At the last index nothing is mutated and the session becomes
    /// `Exhausted`; flagging on the current video remains possible.
    /// Otherwise playback is stopped and the timeline cleared before
    /// the next video loads, and the progress indicator is updated.
    pub fn advance_to_next_video(
        &mut self,
        player: &mut dyn PlayerHandle,
        timeline: &mut dyn TimelineHandle,
        progress: &mut dyn ProgressHandle,
    ) -> AdvanceOutcome {
        if self.current_index + 1 >= self.file_list.len() {
            tracing::info!("No more videos");
            self.exhausted = true;
            return AdvanceOutcome::Exhausted;
        }

        let finished = self.take_current_labels();

        self.current_index += 1;
        player.stop();
        timeline.clear();

        let load = self.load_current_video(player);
        progress.set_current(self.current_index + 1, self.file_list.len());

        match load {
            Ok(info) => AdvanceOutcome::Advanced { finished, info },
            Err(error) => AdvanceOutcome::AdvanceFailed { finished, error },
        }
    }

    /// Take the labels recorded against the current video, leaving the
    /// session ready to accumulate for the next one. Also used at exit
    /// to flush the last video's labels.
    pub fn take_current_labels(&mut self) -> LabelledVideo {
        let mut labelled = LabelledVideo::new(self.current_path(), self.frame_rate);
        labelled.intervals = std::mem::take(&mut self.intervals);
        labelled
    }

    /// Snapshot of the current video's labels, without consuming them.
    /// Used to keep the output file current between advances.
    pub fn current_labels(&self) -> LabelledVideo {
        let mut labelled = LabelledVideo::new(self.current_path(), self.frame_rate);
        labelled.intervals = self.intervals.clone();
        labelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerError;
    use std::collections::VecDeque;

    /// Scriptable player double. Each `current_frame_index` call pops
    /// the next scripted read result.
    struct MockPlayer {
        fps: f64,
        open_fails: bool,
        reads: VecDeque<Result<u32, PlayerError>>,
        refresh_fails: bool,
        refresh_calls: usize,
        stop_calls: usize,
        opened: Vec<PathBuf>,
        events: Vec<String>,
    }

    impl MockPlayer {
        fn with_fps(fps: f64) -> Self {
            Self {
                fps,
                open_fails: false,
                reads: VecDeque::new(),
                refresh_fails: false,
                refresh_calls: 0,
                stop_calls: 0,
                opened: Vec::new(),
                events: Vec::new(),
            }
        }

        fn script_read(&mut self, result: Result<u32, PlayerError>) {
            self.reads.push_back(result);
        }
    }

    impl PlayerHandle for MockPlayer {
        fn open(&mut self, path: &Path) -> Result<VideoInfo, PlayerError> {
            self.events.push(format!("open {}", path.display()));
            if self.open_fails {
                return Err(PlayerError::open_failed(path, "mock failure"));
            }
            self.opened.push(path.to_path_buf());
            Ok(VideoInfo {
                fps: self.fps,
                fps_fraction: (30, 1),
                frame_count: 9000,
                width: 1280,
                height: 720,
                duration_ms: 300_000.0,
            })
        }

        fn current_frame_index(&mut self) -> Result<u32, PlayerError> {
            self.reads
                .pop_front()
                .unwrap_or_else(|| Err(PlayerError::not_loaded()))
        }

        fn frame_rate(&self) -> f64 {
            self.fps
        }

        fn stop(&mut self) {
            self.stop_calls += 1;
            self.events.push("stop".to_string());
        }

        fn refresh(&mut self) -> Result<(), PlayerError> {
            self.refresh_calls += 1;
            if self.refresh_fails {
                Err(PlayerError::not_loaded())
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct MockTimeline {
        periods: Vec<(u32, u32, String)>,
        clear_calls: usize,
        events: Vec<String>,
    }

    impl TimelineHandle for MockTimeline {
        fn add_period(&mut self, start_frame: u32, end_frame: u32, label: &str) {
            self.periods.push((start_frame, end_frame, label.to_string()));
        }

        fn clear(&mut self) {
            self.clear_calls += 1;
            self.periods.clear();
            self.events.push("clear".to_string());
        }
    }

    #[derive(Default)]
    struct MockProgress {
        updates: Vec<(usize, usize)>,
    }

    impl ProgressHandle for MockProgress {
        fn set_current(&mut self, current: usize, total: usize) {
            self.updates.push((current, total));
        }
    }

    fn two_video_session() -> Session {
        Session::new(
            vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")],
            DEFAULT_HAZARD_DURATION_SECS,
        )
        .unwrap()
    }

    #[test]
    fn new_session_starts_at_zero_unloaded() {
        let session = two_video_session();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.hazard_counter(), 0);
        assert!(!session.video_loaded());
        assert_eq!(session.phase(), SessionPhase::Loading);
    }

    #[test]
    fn empty_file_list_is_fatal() {
        let result = Session::new(Vec::new(), DEFAULT_HAZARD_DURATION_SECS);
        assert!(matches!(result, Err(SessionError::EmptyFileList)));
    }

    #[test]
    fn load_computes_default_duration_from_frame_rate() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);

        session.load_current_video(&mut player).unwrap();
        assert!(session.video_loaded());
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.hazard_default_duration(), 60);

        // 29.97 fps rounds to 60 frames as well
        let mut player = MockPlayer::with_fps(29.97);
        session.load_current_video(&mut player).unwrap();
        assert_eq!(session.hazard_default_duration(), 60);
    }

    #[test]
    fn failed_load_keeps_session_loading() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        player.open_fails = true;

        let err = session.load_current_video(&mut player).unwrap_err();
        assert_eq!(err.to_string(), "Unable to select video");
        assert!(!session.video_loaded());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), SessionPhase::Loading);
    }

    #[test]
    fn flag_is_noop_before_video_loaded() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();

        let flagged = session.flag_hazard(&mut player, &mut timeline).unwrap();
        assert!(flagged.is_none());
        assert_eq!(session.hazard_counter(), 0);
        assert!(timeline.periods.is_empty());
    }

    #[test]
    fn flag_produces_interval_and_status() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();

        session.load_current_video(&mut player).unwrap();
        player.script_read(Ok(100));

        let flagged = session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .unwrap();
        assert_eq!(flagged.interval, HazardInterval::new(100, 160, "1"));
        assert_eq!(flagged.status, "Hazard flagged! | Frame: 100 Timestamp: 3.333");
        assert_eq!(session.hazard_counter(), 1);
        assert_eq!(timeline.periods, vec![(100, 160, "1".to_string())]);
    }

    #[test]
    fn single_read_failure_recovers_via_refresh() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();

        session.load_current_video(&mut player).unwrap();
        player.script_read(Err(PlayerError::frame_read(0, "transient")));
        player.script_read(Ok(42));

        let flagged = session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .unwrap();
        assert_eq!(flagged.interval.start_frame, 42);
        assert_eq!(player.refresh_calls, 1);
    }

    #[test]
    fn double_read_failure_is_fatal() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();

        session.load_current_video(&mut player).unwrap();
        player.script_read(Err(PlayerError::frame_read(0, "first")));
        player.script_read(Err(PlayerError::frame_read(0, "second")));

        let err = session.flag_hazard(&mut player, &mut timeline).unwrap_err();
        assert_eq!(err.to_string(), "Unable to label, exiting...");
        assert!(err.is_fatal());
        // Nothing was recorded
        assert_eq!(session.hazard_counter(), 0);
        assert!(timeline.periods.is_empty());
    }

    #[test]
    fn failed_refresh_counts_as_exhausted_retry() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();

        session.load_current_video(&mut player).unwrap();
        player.refresh_fails = true;
        player.script_read(Err(PlayerError::frame_read(0, "first")));

        let err = session.flag_hazard(&mut player, &mut timeline).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn advance_at_last_index_is_guarded() {
        let mut session =
            Session::new(vec![PathBuf::from("only.mp4")], DEFAULT_HAZARD_DURATION_SECS).unwrap();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();
        let mut progress = MockProgress::default();

        session.load_current_video(&mut player).unwrap();
        let outcome = session.advance_to_next_video(&mut player, &mut timeline, &mut progress);

        assert!(matches!(outcome, AdvanceOutcome::Exhausted));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), SessionPhase::Exhausted);
        assert_eq!(player.stop_calls, 0);
        assert_eq!(timeline.clear_calls, 0);
        assert!(progress.updates.is_empty());
        // Flagging on the current video still works
        player.script_read(Ok(10));
        assert!(session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .is_some());
    }

    #[test]
    fn advance_stops_player_and_clears_timeline_before_load() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();
        let mut progress = MockProgress::default();

        session.load_current_video(&mut player).unwrap();
        let outcome = session.advance_to_next_video(&mut player, &mut timeline, &mut progress);

        assert!(matches!(outcome, AdvanceOutcome::Advanced { .. }));
        assert_eq!(session.current_index(), 1);
        assert_eq!(player.stop_calls, 1);
        assert_eq!(timeline.clear_calls, 1);
        assert_eq!(progress.updates, vec![(2, 2)]);
        // stop happens before the second open
        assert_eq!(
            player.events,
            vec!["open a.mp4", "stop", "open b.mp4"]
        );
    }

    #[test]
    fn counter_carries_across_videos() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();
        let mut progress = MockProgress::default();

        session.load_current_video(&mut player).unwrap();
        player.script_read(Ok(100));
        player.script_read(Ok(500));

        let first = session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .unwrap();
        let second = session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .unwrap();
        assert_eq!(first.interval, HazardInterval::new(100, 160, "1"));
        assert_eq!(second.interval, HazardInterval::new(500, 560, "2"));

        let outcome = session.advance_to_next_video(&mut player, &mut timeline, &mut progress);
        let AdvanceOutcome::Advanced { finished, .. } = outcome else {
            panic!("expected advance");
        };
        assert_eq!(finished.path, PathBuf::from("a.mp4"));
        assert_eq!(finished.intervals.len(), 2);
        assert_eq!(session.hazard_counter(), 2);
        assert!(session.intervals().is_empty());

        // Numbering continues on the next video
        player.script_read(Ok(7));
        let third = session
            .flag_hazard(&mut player, &mut timeline)
            .unwrap()
            .unwrap();
        assert_eq!(third.interval.label, "3");

        // And the list is now exhausted
        let outcome = session.advance_to_next_video(&mut player, &mut timeline, &mut progress);
        assert!(matches!(outcome, AdvanceOutcome::Exhausted));
    }

    #[test]
    fn advance_surfaces_load_failure_without_losing_labels() {
        let mut session = two_video_session();
        let mut player = MockPlayer::with_fps(30.0);
        let mut timeline = MockTimeline::default();
        let mut progress = MockProgress::default();

        session.load_current_video(&mut player).unwrap();
        player.script_read(Ok(100));
        session.flag_hazard(&mut player, &mut timeline).unwrap();

        player.open_fails = true;
        let outcome = session.advance_to_next_video(&mut player, &mut timeline, &mut progress);

        let AdvanceOutcome::AdvanceFailed { finished, error } = outcome else {
            panic!("expected failed advance");
        };
        assert_eq!(finished.intervals.len(), 1);
        assert_eq!(error.to_string(), "Unable to select video");
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), SessionPhase::Loading);
        // Progress still reflects the new position
        assert_eq!(progress.updates, vec![(2, 2)]);
    }
}
