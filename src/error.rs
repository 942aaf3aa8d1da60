//! Error type shared by the library index, the playback session and the engine.
//!
//! Every error is terminal to the user action that triggered it only: the
//! shell turns it into a modal message and carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A transport action needs a selected video and there is none.
    #[error("No video selected")]
    NoMediaSelected,

    /// Importing would overwrite an existing library entry.
    #[error("Video already exists in the folder")]
    DuplicateEntry(PathBuf),

    /// A search was submitted with a blank query.
    #[error("Enter a video name to search")]
    EmptyQuery,

    /// The library directory does not exist.
    #[error("Library folder not found: {}", .0.display())]
    DirectoryMissing(PathBuf),

    /// The import source is not one of the recognized video formats.
    #[error("Not a recognized video file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// Opaque failure reported by the playback engine, shown verbatim.
    #[error("{0}")]
    EngineFailure(String),

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::EngineFailure(msg.into())
    }

    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    /// User slips rather than failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::NoMediaSelected)
    }

    /// Modal title the shell uses for this error.
    pub fn title(&self) -> &'static str {
        if self.is_warning() { "Warning" } else { "Error" }
    }
}
