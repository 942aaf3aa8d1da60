//! Application model types: `App`, input modes and modal messages.
//!
//! The `App` struct holds the library, the playback session, the list cursor
//! and whatever prompt or message is on screen. Each public method is one user
//! intent; errors never escape, they become a modal message.

use std::path::PathBuf;

use tracing::warn;

use crate::config::ControlsSettings;
use crate::engine::MediaEngine;
use crate::error::Error;
use crate::library::LibraryIndex;
use crate::session::{PlaybackSession, RecordingEvent};

/// What typed characters go to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Editing the search box.
    Search,
    /// Typing the path of a video to add.
    Import,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Info,
    Warning,
    Error,
}

/// A message box; any key dismisses it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub text: String,
}

impl Modal {
    pub fn info(title: &str, text: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Info,
            title: title.to_string(),
            text: text.into(),
        }
    }

    pub fn from_error(err: &Error) -> Self {
        let kind = if err.is_warning() {
            ModalKind::Warning
        } else {
            ModalKind::Error
        };
        Self {
            kind,
            title: err.title().to_string(),
            text: err.to_string(),
        }
    }
}

/// The main application model.
pub struct App<E: MediaEngine + 'static> {
    pub library: LibraryIndex,
    pub session: PlaybackSession<E>,
    /// Cursor position within `library.visible()`.
    pub selected: usize,
    pub mode: InputMode,
    /// Text being typed in the current prompt.
    pub input: String,
    pub modal: Option<Modal>,
    volume_step: u8,
    seek_step: u8,
}

impl<E: MediaEngine + 'static> App<E> {
    pub fn new(library: LibraryIndex, session: PlaybackSession<E>, controls: &ControlsSettings) -> Self {
        Self {
            library,
            session,
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            modal: None,
            volume_step: controls.volume_step,
            seek_step: controls.seek_step_percent,
        }
    }

    /// Show `err` to the user. The action that raised it is simply abandoned.
    pub fn report(&mut self, err: Error) {
        warn!("{err}");
        self.modal = Some(Modal::from_error(&err));
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    // List navigation

    /// Move the cursor down, wrapping to the top.
    pub fn cursor_down(&mut self) {
        let len = self.library.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        let len = self.library.visible().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.library.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// After the visible list changed: fix the cursor and the session's index.
    fn listing_changed(&mut self) {
        self.clamp_cursor();
        self.session.relocate(self.library.visible());
    }

    // Prompts

    pub fn begin_search(&mut self) {
        self.mode = InputMode::Search;
        self.input = self.library.query().unwrap_or_default().to_string();
    }

    pub fn begin_import(&mut self) {
        self.mode = InputMode::Import;
        self.input.clear();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }

    /// Enter in a prompt: run the search or the import.
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.mode, InputMode::Normal);
        match mode {
            InputMode::Search => self.search(&text),
            InputMode::Import => self.add_video(PathBuf::from(text.trim())),
            InputMode::Normal => {}
        }
    }

    // Library intents

    pub fn search(&mut self, query: &str) {
        let result = self.library.search(query).map(|hits| hits.len());
        match result {
            Ok(_) => {
                self.selected = 0;
                self.listing_changed();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn clear_search(&mut self) {
        self.library.clear_search();
        self.listing_changed();
    }

    pub fn rescan(&mut self) {
        self.library.rescan();
        self.listing_changed();
    }

    pub fn add_video(&mut self, source: PathBuf) {
        match self.library.import(&source) {
            Ok(entry) => {
                if let Some(pos) = self.library.visible().iter().position(|e| *e == entry) {
                    self.selected = pos;
                }
                self.listing_changed();
            }
            Err(e) => self.report(e),
        }
    }

    /// Double-click on the list row under the cursor.
    pub fn activate_selected(&mut self) {
        if self.library.visible().is_empty() {
            return;
        }
        if let Err(e) = self.session.select(self.library.visible(), self.selected) {
            self.report(e);
        }
    }

    // Transport intents. Disabled controls ignore the intent.

    pub fn play(&mut self) {
        if !self.session.controls().play {
            return;
        }
        if let Err(e) = self.session.play() {
            self.report(e);
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.session.controls().pause {
            return;
        }
        if let Err(e) = self.session.pause() {
            self.report(e);
        }
    }

    pub fn stop(&mut self) {
        if !self.session.controls().stop {
            return;
        }
        if let Err(e) = self.session.stop() {
            self.report(e);
        }
    }

    pub fn next(&mut self) {
        if !self.session.controls().next {
            return;
        }
        match self.session.next(self.library.visible()) {
            Ok(_) => self.follow_session(),
            Err(e) => self.report(e),
        }
    }

    pub fn previous(&mut self) {
        if !self.session.controls().previous {
            return;
        }
        match self.session.previous(self.library.visible()) {
            Ok(_) => self.follow_session(),
            Err(e) => self.report(e),
        }
    }

    /// Keep the list cursor on the video the session navigated to.
    fn follow_session(&mut self) {
        if let Some(i) = self.session.current_index() {
            self.selected = i;
        }
    }

    pub fn toggle_mute(&mut self) {
        if let Err(e) = self.session.toggle_mute() {
            self.report(e);
        }
    }

    pub fn volume_up(&mut self) {
        let level = self.session.volume().saturating_add(self.volume_step).min(100);
        self.set_volume(level);
    }

    pub fn volume_down(&mut self) {
        let level = self.session.volume().saturating_sub(self.volume_step);
        self.set_volume(level);
    }

    pub fn set_volume(&mut self, level: u8) {
        if let Err(e) = self.session.set_volume(level) {
            self.report(e);
        }
    }

    /// Seek slider released at `percent`.
    pub fn seek_to_percent(&mut self, percent: u8) {
        let fraction = f64::from(percent.min(100)) / 100.0;
        if let Err(e) = self.session.seek(fraction) {
            self.report(e);
        }
    }

    /// Drag the seek slider one step from the current position and release it.
    pub fn nudge_seek(&mut self, forward: bool) {
        let current = self
            .session
            .progress()
            .lock()
            .map(|p| p.percent())
            .unwrap_or(0);
        let target = if forward {
            current.saturating_add(self.seek_step).min(100)
        } else {
            current.saturating_sub(self.seek_step)
        };
        self.seek_to_percent(target);
    }

    pub fn snapshot(&mut self) {
        if !self.session.controls().snapshot {
            return;
        }
        match self.session.snapshot() {
            Ok(path) => {
                self.modal = Some(Modal::info(
                    "Snapshot Taken",
                    format!("Snapshot saved as:\n{}", path.display()),
                ));
            }
            Err(e) => self.report(e),
        }
    }

    pub fn toggle_recording(&mut self) {
        if !self.session.controls().record {
            return;
        }
        match self.session.toggle_recording() {
            Ok(RecordingEvent::Started(path)) => {
                self.modal = Some(Modal::info(
                    "Recording Started",
                    format!("Recording to: {}", path.display()),
                ));
            }
            Ok(RecordingEvent::Stopped(path)) => {
                self.modal = Some(Modal::info(
                    "Recording Stopped",
                    format!("Saved as:\n{}", path.display()),
                ));
            }
            Err(e) => self.report(e),
        }
    }

    /// Release the engine before exit.
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}
