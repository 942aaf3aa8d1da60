//! The playback engine seam.
//!
//! The session talks to a `MediaEngine` and nothing else. Decoding, rendering
//! and muxing all live behind it; the session only sees states, times and
//! errors. Read calls (`state`, `time_ms`, `length_ms`) must be safe from the
//! poller thread while the UI thread issues commands.

mod clock;
mod ffmpeg;
mod output;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::Result;

use clock::PlaybackClock;

pub use output::OutputHandle;
pub use player::RodioEngine;
pub use types::{EngineState, Media};

pub trait MediaEngine: Send + Sync {
    /// Replace the current media. Stops whatever was playing.
    fn load(&self, media: Media) -> Result<()>;
    /// Attach the native surface video is drawn into.
    fn bind_output(&self, handle: OutputHandle) -> Result<()>;
    /// Start the loaded media, or resume it when paused.
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn is_playing(&self) -> bool;
    fn state(&self) -> EngineState;
    /// Current position in milliseconds.
    fn time_ms(&self) -> i64;
    /// Absolute seek in milliseconds.
    fn set_time_ms(&self, ms: i64) -> Result<()>;
    /// Media length in milliseconds, 0 when unknown.
    fn length_ms(&self) -> i64;
    /// Volume in 0..=100.
    fn set_volume(&self, level: u8) -> Result<()>;
    fn toggle_mute(&self) -> Result<()>;
    /// Write one still frame of video stream `stream` to `path`. Zero width or
    /// height keeps the source size.
    fn take_snapshot(&self, stream: u32, path: &Path, width: u32, height: u32) -> Result<()>;
}

#[derive(Debug)]
pub(crate) enum EngineCmd {
    Load(Media),
    BindOutput(OutputHandle),
    Play,
    Pause,
    Stop,
    SetTime(Duration),
    SetVolume(u8),
    ToggleMute,
    Snapshot {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Quit,
}

/// A command plus the channel its outcome is reported on.
pub(crate) struct Request {
    cmd: EngineCmd,
    reply: Sender<Result<()>>,
}

/// Engine status shared with readers on other threads.
#[derive(Debug, Default)]
pub(crate) struct EngineStatus {
    state: EngineState,
    clock: PlaybackClock,
    length: Duration,
}

pub(crate) type StatusHandle = Arc<Mutex<EngineStatus>>;
