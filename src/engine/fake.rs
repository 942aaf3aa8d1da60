//! A scripted engine that records every call, for session and app tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

use super::{EngineState, Media, MediaEngine, OutputHandle};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(Media),
    BindOutput(OutputHandle),
    Play,
    Pause,
    Stop,
    SetTime(i64),
    SetVolume(u8),
    ToggleMute,
    Snapshot(PathBuf),
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<Call>,
    state: EngineState,
    time_ms: i64,
    length_ms: i64,
    fail_play: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    inner: Mutex<Inner>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut inner)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.with(|i| i.calls.clone())
    }

    pub(crate) fn clear_calls(&self) {
        self.with(|i| i.calls.clear());
    }

    pub(crate) fn set_state(&self, state: EngineState) {
        self.with(|i| i.state = state);
    }

    pub(crate) fn set_time(&self, ms: i64) {
        self.with(|i| i.time_ms = ms);
    }

    pub(crate) fn set_length(&self, ms: i64) {
        self.with(|i| i.length_ms = ms);
    }

    pub(crate) fn fail_next_play(&self, msg: &str) {
        self.with(|i| i.fail_play = Some(msg.to_string()));
    }
}

impl MediaEngine for FakeEngine {
    fn load(&self, media: Media) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Load(media));
            i.state = EngineState::Opening;
            i.time_ms = 0;
        });
        Ok(())
    }

    fn bind_output(&self, handle: OutputHandle) -> Result<()> {
        self.with(|i| i.calls.push(Call::BindOutput(handle)));
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Play);
            if let Some(msg) = i.fail_play.take() {
                i.state = EngineState::Error;
                return Err(Error::engine(msg));
            }
            i.state = EngineState::Playing;
            Ok(())
        })
    }

    fn pause(&self) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Pause);
            if i.state == EngineState::Playing {
                i.state = EngineState::Paused;
            }
        });
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::Stop);
            i.state = EngineState::Stopped;
        });
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.with(|i| i.state == EngineState::Playing)
    }

    fn state(&self) -> EngineState {
        self.with(|i| i.state)
    }

    fn time_ms(&self) -> i64 {
        self.with(|i| i.time_ms)
    }

    fn set_time_ms(&self, ms: i64) -> Result<()> {
        self.with(|i| {
            i.calls.push(Call::SetTime(ms));
            i.time_ms = ms;
        });
        Ok(())
    }

    fn length_ms(&self) -> i64 {
        self.with(|i| i.length_ms)
    }

    fn set_volume(&self, level: u8) -> Result<()> {
        self.with(|i| i.calls.push(Call::SetVolume(level)));
        Ok(())
    }

    fn toggle_mute(&self) -> Result<()> {
        self.with(|i| i.calls.push(Call::ToggleMute));
        Ok(())
    }

    fn take_snapshot(&self, _stream: u32, path: &Path, _width: u32, _height: u32) -> Result<()> {
        self.with(|i| i.calls.push(Call::Snapshot(path.to_path_buf())));
        Ok(())
    }
}
