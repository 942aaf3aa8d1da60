use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::ffmpeg::{self, Recorder};
use super::output::OutputHandle;
use super::sink::{create_sink_at, decoded_length};
use super::types::{EngineState, Media};
use super::{EngineCmd, Request, StatusHandle};

pub(super) fn spawn_engine_thread(
    rx: Receiver<Request>,
    status: StatusHandle,
    ffmpeg: PathBuf,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = EngineThread::new(status, ffmpeg);
        info!("engine thread started");

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(Request { cmd, reply }) => {
                    let quit = matches!(cmd, EngineCmd::Quit);
                    let result = engine.handle(cmd);
                    let _ = reply.send(result);
                    if quit {
                        break;
                    }
                }
                // Periodic check for the end of the media.
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    engine.stop();
                    break;
                }
            }
        }
        info!("engine thread stopped");
    })
}

struct EngineThread {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    media: Option<Media>,
    output: OutputHandle,
    volume: u8,
    muted: bool,
    recorder: Option<Recorder>,
    status: StatusHandle,
    ffmpeg: PathBuf,
}

impl EngineThread {
    fn new(status: StatusHandle, ffmpeg: PathBuf) -> Self {
        Self {
            stream: None,
            sink: None,
            media: None,
            output: OutputHandle::Detached,
            volume: 100,
            muted: false,
            recorder: None,
            status,
            ffmpeg,
        }
    }

    fn handle(&mut self, cmd: EngineCmd) -> Result<()> {
        match cmd {
            EngineCmd::Load(media) => {
                self.load(media);
                Ok(())
            }
            EngineCmd::BindOutput(handle) => {
                debug!(?handle, "video output bound");
                self.output = handle;
                Ok(())
            }
            EngineCmd::Play => self.play(),
            EngineCmd::Pause => {
                self.pause();
                Ok(())
            }
            EngineCmd::Stop | EngineCmd::Quit => {
                self.stop();
                Ok(())
            }
            EngineCmd::SetTime(at) => self.set_time(at),
            EngineCmd::SetVolume(level) => {
                self.volume = level.min(100);
                self.apply_volume();
                Ok(())
            }
            EngineCmd::ToggleMute => {
                self.muted = !self.muted;
                self.apply_volume();
                Ok(())
            }
            EngineCmd::Snapshot {
                path,
                width,
                height,
            } => self.snapshot(&path, width, height),
        }
    }

    fn set_state(&self, state: EngineState) {
        if let Ok(mut s) = self.status.lock() {
            s.state = state;
        }
    }

    fn state(&self) -> EngineState {
        self.status
            .lock()
            .map(|s| s.state)
            .unwrap_or(EngineState::Error)
    }

    fn apply_volume(&self) {
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(if self.muted {
                0.0
            } else {
                f32::from(self.volume) / 100.0
            });
        }
    }

    fn load(&mut self, media: Media) {
        self.stop();
        let length = media_length(media.path());
        info!(path = %media.path().display(), ?length, "media loaded");
        if let Ok(mut s) = self.status.lock() {
            s.length = length;
            s.clock.reset(Duration::ZERO, false);
            s.state = EngineState::Opening;
        }
        self.media = Some(media);
    }

    fn output_stream(&mut self) -> Result<&OutputStream> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| Error::engine(format!("no audio output device: {e}")))?;
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the terminal UI.
            stream.log_on_drop(false);
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| Error::engine("no audio output device"))
    }

    fn play(&mut self) -> Result<()> {
        match self.state() {
            EngineState::Playing => return Ok(()),
            EngineState::Paused if self.sink.is_some() => {
                if let Some(s) = self.sink.as_ref() {
                    s.play();
                }
                if let Ok(mut st) = self.status.lock() {
                    st.clock.resume();
                    st.state = EngineState::Playing;
                }
                return Ok(());
            }
            _ => {}
        }

        let Some(media) = self.media.clone() else {
            return Err(Error::engine("no media loaded"));
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let sink = match self
            .output_stream()
            .and_then(|stream| create_sink_at(stream, media.path(), Duration::ZERO))
        {
            Ok(sink) => sink,
            Err(e) => {
                warn!(path = %media.path().display(), "playback failed: {e}");
                self.set_state(EngineState::Error);
                return Err(e);
            }
        };

        self.sink = Some(sink);
        self.apply_volume();
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        if let Ok(mut st) = self.status.lock() {
            st.clock.reset(Duration::ZERO, true);
            st.state = EngineState::Playing;
        }

        if let Some(dest) = self.take_recording_dest() {
            if let Some(r) = self.recorder.take() {
                r.finish();
            }
            match Recorder::start(&self.ffmpeg, media.path(), &dest) {
                Ok(r) => self.recorder = Some(r),
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// The stream-output option applies to the first play after a load only,
    /// so replaying the same media never restarts the recorder on its file.
    fn take_recording_dest(&mut self) -> Option<PathBuf> {
        self.media.as_mut().and_then(Media::take_stream_output_file)
    }

    fn pause(&mut self) {
        if self.state() != EngineState::Playing {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Ok(mut st) = self.status.lock() {
            st.clock.pause();
            st.state = EngineState::Paused;
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        if let Some(r) = self.recorder.take() {
            r.finish();
        }
        if let Ok(mut st) = self.status.lock() {
            st.clock.reset(Duration::ZERO, false);
            if self.media.is_some() {
                st.state = EngineState::Stopped;
            }
        }
    }

    fn set_time(&mut self, at: Duration) -> Result<()> {
        let state = self.state();
        if !matches!(state, EngineState::Playing | EngineState::Paused) {
            return Ok(());
        }
        let Some(path) = self.media.as_ref().map(|m| m.path().to_path_buf()) else {
            return Ok(());
        };

        // Scrubbing: rebuild the sink and skip into the file.
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        let sink = self
            .output_stream()
            .and_then(|stream| create_sink_at(stream, &path, at))?;
        let playing = state == EngineState::Playing;
        if playing {
            sink.play();
        }
        self.sink = Some(sink);
        self.apply_volume();
        if let Ok(mut st) = self.status.lock() {
            st.clock.reset(at, playing);
        }
        Ok(())
    }

    fn snapshot(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        let Some(media) = self.media.as_ref() else {
            return Err(Error::engine("no media loaded"));
        };
        let at = self
            .status
            .lock()
            .map(|s| s.clock.elapsed())
            .unwrap_or(Duration::ZERO);
        ffmpeg::grab_frame(&self.ffmpeg, media.path(), at, path, width, height)?;
        info!(dest = %path.display(), ?at, "snapshot written");
        Ok(())
    }

    fn tick(&mut self) {
        let ended = self.state() == EngineState::Playing
            && self.sink.as_ref().is_some_and(|s| s.empty());
        if ended {
            if let Ok(mut st) = self.status.lock() {
                st.clock.pause();
                st.state = EngineState::Ended;
            }
            debug!("media ended");
        }
    }
}

/// Media length from container metadata, falling back to the decoder.
fn media_length(path: &Path) -> Duration {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
        .or_else(|| decoded_length(path))
        .unwrap_or(Duration::ZERO)
}
