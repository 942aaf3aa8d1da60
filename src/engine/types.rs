//! Small engine-facing value types: engine state and media references.

use std::path::{Path, PathBuf};

/// State reported by the playback engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Nothing loaded.
    #[default]
    NothingSpecial,
    Opening,
    Playing,
    Paused,
    Stopped,
    /// Reached the end of the media.
    Ended,
    Error,
}

impl EngineState {
    /// `Ended` and `Stopped` end a playback instance; the poller exits on them.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Stopped)
    }
}

const SOUT_FILE_PREFIX: &str = ":sout=#file{dst=";

/// A reference to one media file plus engine options, built fresh per load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    path: PathBuf,
    options: Vec<String>,
}

impl Media {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: Vec::new(),
        }
    }

    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }

    /// Direct a copy of the stream into `dest` while playing.
    pub fn with_stream_output_file(mut self, dest: &Path) -> Self {
        self.add_option(format!("{SOUT_FILE_PREFIX}{}}}", dest.display()));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Destination of the first stream-output file option, if any.
    pub fn stream_output_file(&self) -> Option<PathBuf> {
        self.options.iter().find_map(|o| sout_destination(o))
    }

    /// Remove every stream-output file option, returning the first destination.
    pub fn take_stream_output_file(&mut self) -> Option<PathBuf> {
        let dest = self.stream_output_file();
        self.options.retain(|o| sout_destination(o).is_none());
        dest
    }
}

fn sout_destination(option: &str) -> Option<PathBuf> {
    option
        .strip_prefix(SOUT_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|dst| !dst.is_empty())
        .map(PathBuf::from)
}
