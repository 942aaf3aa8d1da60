use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{Error, Result};

use super::output::OutputHandle;
use super::thread::spawn_engine_thread;
use super::types::{EngineState, Media};
use super::{EngineCmd, EngineStatus, MediaEngine, Request, StatusHandle};

/// Engine backed by `rodio` for the audio track and `ffmpeg` for snapshots and
/// recordings. All playback happens on a dedicated thread; status reads are
/// served from a shared snapshot so the poller never waits on a command.
pub struct RodioEngine {
    tx: Sender<Request>,
    status: StatusHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    pub fn new(ffmpeg: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<Request>();
        let status: StatusHandle = Arc::new(Mutex::new(EngineStatus::default()));
        let join = spawn_engine_thread(rx, status.clone(), ffmpeg);

        Self {
            tx,
            status,
            join: Mutex::new(Some(join)),
        }
    }

    fn request(&self, cmd: EngineCmd) -> Result<()> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(Request { cmd, reply })
            .map_err(|_| Error::engine("playback engine is not running"))?;
        rx.recv()
            .map_err(|_| Error::engine("playback engine is not running"))?
    }

    fn read<T>(&self, f: impl FnOnce(&EngineStatus) -> T, fallback: T) -> T {
        self.status.lock().map(|s| f(&s)).unwrap_or(fallback)
    }
}

impl MediaEngine for RodioEngine {
    fn load(&self, media: Media) -> Result<()> {
        self.request(EngineCmd::Load(media))
    }

    fn bind_output(&self, handle: OutputHandle) -> Result<()> {
        self.request(EngineCmd::BindOutput(handle))
    }

    fn play(&self) -> Result<()> {
        self.request(EngineCmd::Play)
    }

    fn pause(&self) -> Result<()> {
        self.request(EngineCmd::Pause)
    }

    fn stop(&self) -> Result<()> {
        self.request(EngineCmd::Stop)
    }

    fn is_playing(&self) -> bool {
        self.state() == EngineState::Playing
    }

    fn state(&self) -> EngineState {
        self.read(|s| s.state, EngineState::Error)
    }

    fn time_ms(&self) -> i64 {
        self.read(|s| duration_ms(s.clock.elapsed()), 0)
    }

    fn set_time_ms(&self, ms: i64) -> Result<()> {
        let at = Duration::from_millis(u64::try_from(ms).unwrap_or(0));
        self.request(EngineCmd::SetTime(at))
    }

    fn length_ms(&self) -> i64 {
        self.read(|s| duration_ms(s.length), 0)
    }

    fn set_volume(&self, level: u8) -> Result<()> {
        self.request(EngineCmd::SetVolume(level))
    }

    fn toggle_mute(&self) -> Result<()> {
        self.request(EngineCmd::ToggleMute)
    }

    fn take_snapshot(&self, _stream: u32, path: &Path, width: u32, height: u32) -> Result<()> {
        self.request(EngineCmd::Snapshot {
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        let _ = self.request(EngineCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
