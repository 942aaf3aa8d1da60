//! The playback session: one selected video, transport commands, and the
//! UI-facing flags that go with them.
//!
//! The session is an explicit value owned by the shell. It forwards every
//! transport action to the engine, keeps the paused/muted/recording flags and
//! the library position used for next/previous, and owns the position poller.

mod controls;
mod poller;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::engine::{EngineState, Media, MediaEngine, OutputHandle};
use crate::error::{Error, Result};
use crate::library::LibraryEntry;

pub use controls::{Controls, MuteLabel, PauseLabel, RecordLabel};
pub use poller::{Poller, Progress, ProgressHandle};

/// Coarse playback phase shown by the UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// No video selected.
    Idle,
    /// Selected, loaded or not, and not currently running.
    Ready,
    Playing,
    Paused,
    Stopped,
    Ended,
}

/// Outcome of `toggle_recording`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingEvent {
    Started(PathBuf),
    Stopped(PathBuf),
}

/// Outcome of `next` / `previous`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved(usize),
    /// Already at the first or last entry; nothing happened.
    AtBoundary,
}

/// Seconds since the Unix epoch; used to name snapshots and recordings.
pub type UnixClock = fn() -> u64;

fn system_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

pub struct PlaybackSession<E: MediaEngine + 'static> {
    engine: Arc<E>,
    library_dir: PathBuf,
    output: OutputHandle,
    clock: UnixClock,

    current_path: Option<PathBuf>,
    current_index: Option<usize>,
    paused: bool,
    muted: bool,
    recording: bool,
    record_path: Option<PathBuf>,
    volume: u8,

    controls: Controls,
    poller: Poller,
}

impl<E: MediaEngine + 'static> PlaybackSession<E> {
    pub fn new(
        engine: Arc<E>,
        library_dir: PathBuf,
        output: OutputHandle,
        poll_interval: Duration,
    ) -> Self {
        Self {
            engine,
            library_dir,
            output,
            clock: system_unix_seconds,
            current_path: None,
            current_index: None,
            paused: false,
            muted: false,
            recording: false,
            record_path: None,
            volume: 100,
            controls: Controls::default(),
            poller: Poller::new(poll_interval),
        }
    }

    /// Replace the clock used for output file names.
    pub fn with_clock(mut self, clock: UnixClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn progress(&self) -> ProgressHandle {
        self.poller.progress()
    }

    #[cfg(test)]
    pub(crate) fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn record_path(&self) -> Option<&Path> {
        self.record_path.as_deref()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn phase(&self) -> SessionPhase {
        if self.current_path.is_none() {
            return SessionPhase::Idle;
        }
        match self.engine.state() {
            EngineState::Playing => SessionPhase::Playing,
            EngineState::Paused => SessionPhase::Paused,
            EngineState::Stopped => SessionPhase::Stopped,
            EngineState::Ended => SessionPhase::Ended,
            _ => SessionPhase::Ready,
        }
    }

    /// Choose the entry at `index` of `entries`. Does not start playback.
    ///
    /// Choosing a different video forgets a pause on the previous one, so the
    /// next `play` loads the new selection instead of resuming the old media.
    pub fn select(&mut self, entries: &[LibraryEntry], index: usize) -> Result<()> {
        let entry = entries.get(index).ok_or(Error::NoMediaSelected)?;
        debug!(index, name = %entry.name, "selected");
        if self.current_path.as_deref() != Some(entry.path.as_path()) {
            self.paused = false;
            self.controls.pause_label = PauseLabel::Pause;
        }
        self.current_path = Some(entry.path.clone());
        self.current_index = Some(index);
        self.controls.on_select();
        Ok(())
    }

    /// Re-point `current_index` at the selected video within a new listing
    /// (after a search, a cleared search or a rescan).
    pub fn relocate(&mut self, entries: &[LibraryEntry]) {
        self.current_index = self
            .current_path
            .as_deref()
            .and_then(|p| entries.iter().position(|e| e.path == p));
    }

    /// Resume when paused, otherwise load the selected video afresh and play it.
    pub fn play(&mut self) -> Result<()> {
        let Some(path) = self.current_path.clone() else {
            return Err(Error::NoMediaSelected);
        };

        if self.paused {
            self.engine.play()?;
            self.paused = false;
            self.controls.pause_label = PauseLabel::Pause;
            info!(path = %path.display(), "resumed");
        } else {
            // A fresh load replaces any recording media.
            self.end_recording();
            self.engine.load(Media::from_path(&path))?;
            // The surface must be attached before the first frame.
            self.engine.bind_output(self.output)?;
            self.engine.play()?;
            info!(path = %path.display(), "playing");
        }

        self.controls.on_play();
        self.poller.start(self.engine.clone());
        Ok(())
    }

    /// Play/pause toggle: pause when the engine is playing, otherwise `play`,
    /// which resumes a paused video or loads the selection afresh.
    pub fn pause(&mut self) -> Result<()> {
        if self.current_path.is_none() {
            return Err(Error::NoMediaSelected);
        }
        if self.engine.is_playing() {
            self.engine.pause()?;
            self.paused = true;
            self.controls.pause_label = PauseLabel::Resume;
            info!("paused");
        } else {
            self.play()?;
            self.controls.pause_label = PauseLabel::Pause;
        }
        Ok(())
    }

    /// Stop the engine. The selection stays, so a later `play` reloads it.
    pub fn stop(&mut self) -> Result<()> {
        self.poller.cancel();
        self.engine.stop()?;
        self.paused = false;
        self.end_recording();
        self.controls.on_stop();
        info!("stopped");
        Ok(())
    }

    /// The engine finalises the recording whenever its media is stopped or
    /// replaced; keep the flag and label in step with that.
    fn end_recording(&mut self) {
        if self.recording {
            self.recording = false;
            self.controls.record_label = RecordLabel::Start;
            debug!("recording ended with its media");
        }
    }

    /// Select and play the entry after the current one.
    pub fn next(&mut self, entries: &[LibraryEntry]) -> Result<Navigation> {
        let target = self.current_index.map_or(0, |i| i.saturating_add(1));
        if target >= entries.len() {
            return Ok(Navigation::AtBoundary);
        }
        self.jump(entries, target)
    }

    /// Select and play the entry before the current one.
    pub fn previous(&mut self, entries: &[LibraryEntry]) -> Result<Navigation> {
        let Some(target) = self.current_index.and_then(|i| i.checked_sub(1)) else {
            return Ok(Navigation::AtBoundary);
        };
        if target >= entries.len() {
            return Ok(Navigation::AtBoundary);
        }
        self.jump(entries, target)
    }

    fn jump(&mut self, entries: &[LibraryEntry], target: usize) -> Result<Navigation> {
        self.select(entries, target)?;
        // Navigation always loads the neighbour fresh.
        self.paused = false;
        self.play()?;
        Ok(Navigation::Moved(target))
    }

    /// Seek to `fraction` of the media. A no-op while the length is unknown.
    pub fn seek(&mut self, fraction: f64) -> Result<()> {
        let length = self.engine.length_ms();
        if length <= 0 {
            debug!("seek ignored, media length unknown");
            return Ok(());
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = (length as f64 * fraction) as i64;
        self.engine.set_time_ms(target)?;
        debug!(target_ms = target, "seeked");
        Ok(())
    }

    pub fn set_volume(&mut self, level: u8) -> Result<()> {
        let level = level.min(100);
        self.engine.set_volume(level)?;
        self.volume = level;
        Ok(())
    }

    pub fn toggle_mute(&mut self) -> Result<()> {
        self.engine.toggle_mute()?;
        self.muted = !self.muted;
        self.controls.mute_label = if self.muted {
            MuteLabel::Unmute
        } else {
            MuteLabel::Mute
        };
        Ok(())
    }

    /// Save the current frame as `snapshot_<unix seconds>.png` in the library folder.
    pub fn snapshot(&mut self) -> Result<PathBuf> {
        if self.current_path.is_none() {
            return Err(Error::NoMediaSelected);
        }
        let path = self
            .library_dir
            .join(format!("snapshot_{}.png", (self.clock)()));
        self.engine.take_snapshot(0, &path, 0, 0)?;
        info!(path = %path.display(), "snapshot taken");
        Ok(path)
    }

    /// Start or stop recording the selected video to
    /// `recorded_<unix seconds>.mp4` in the library folder.
    ///
    /// Starting replaces the playing media with a recording-enabled copy, so
    /// playback restarts from the beginning.
    pub fn toggle_recording(&mut self) -> Result<RecordingEvent> {
        let Some(path) = self.current_path.clone() else {
            return Err(Error::NoMediaSelected);
        };

        if self.recording {
            self.poller.cancel();
            self.engine.stop()?;
            self.recording = false;
            self.controls.record_label = RecordLabel::Start;
            let saved = self.record_path.clone().unwrap_or_default();
            info!(path = %saved.display(), "recording stopped");
            return Ok(RecordingEvent::Stopped(saved));
        }

        let dest = self
            .library_dir
            .join(format!("recorded_{}.mp4", (self.clock)()));
        self.engine
            .load(Media::from_path(&path).with_stream_output_file(&dest))?;
        self.engine.play()?;

        self.recording = true;
        self.paused = false;
        self.record_path = Some(dest.clone());
        self.controls.record_label = RecordLabel::Stop;
        self.controls.pause_label = PauseLabel::Pause;
        self.controls.on_play();
        self.poller.start(self.engine.clone());
        info!(path = %dest.display(), "recording started");
        Ok(RecordingEvent::Started(dest))
    }

    /// Stop the engine before the process exits.
    pub fn shutdown(&mut self) {
        self.poller.cancel();
        if let Err(e) = self.engine.stop() {
            debug!("engine stop on shutdown failed: {e}");
        }
        self.end_recording();
    }
}
