//! The video library: one folder on disk, scanned live.
//!
//! `LibraryIndex` keeps the full scan result apart from the filtered view so
//! clearing a search always restores every entry.

mod filter;
mod import;
mod model;
mod scan;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

pub use filter::filter;
pub use import::import_file;
pub use model::LibraryEntry;
pub use scan::{is_video_name, scan};

pub struct LibraryIndex {
    dir: PathBuf,
    settings: LibrarySettings,
    entries: Vec<LibraryEntry>,
    view: Option<Vec<LibraryEntry>>,
    query: Option<String>,
}

impl LibraryIndex {
    /// Create the library folder if needed and scan it.
    pub fn open(settings: &LibrarySettings) -> Result<Self> {
        fs::create_dir_all(&settings.directory)
            .map_err(|e| Error::io("create library folder", e))?;
        let mut index = Self::new(settings.directory.clone(), settings.clone());
        index.rescan();
        Ok(index)
    }

    /// An empty index over `dir`; call `rescan` to populate it.
    pub fn new(dir: PathBuf, settings: LibrarySettings) -> Self {
        Self {
            dir,
            settings,
            entries: Vec::new(),
            view: None,
            query: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every entry from the last scan, ignoring any search.
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    /// The entries currently shown: the search result, or everything.
    pub fn visible(&self) -> &[LibraryEntry] {
        self.view.as_deref().unwrap_or(&self.entries)
    }

    /// The active search query, if a search is applied.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Re-read the folder. A missing folder yields an empty library.
    ///
    /// Any active search is dropped, like a fresh list reload.
    pub fn rescan(&mut self) -> &[LibraryEntry] {
        self.entries = match scan(&self.dir, &self.settings) {
            Ok(entries) => entries,
            Err(Error::DirectoryMissing(dir)) => {
                warn!(dir = %dir.display(), "library folder missing, showing an empty list");
                Vec::new()
            }
            Err(e) => {
                warn!("library scan failed: {e}");
                Vec::new()
            }
        };
        self.clear_search();
        &self.entries
    }

    /// Narrow the view to entries matching `query`. Always searches the full
    /// scan result, never a previous view.
    pub fn search(&mut self, query: &str) -> Result<&[LibraryEntry]> {
        let hits = filter(&self.entries, query)?;
        self.query = Some(query.trim().to_string());
        let view = self.view.insert(hits);
        Ok(view.as_slice())
    }

    pub fn clear_search(&mut self) {
        self.view = None;
        self.query = None;
    }

    /// Move `source` into the library and rescan.
    pub fn import(&mut self, source: &Path) -> Result<LibraryEntry> {
        let entry = import_file(source, &self.dir, &self.settings)?;
        self.rescan();
        Ok(entry)
    }
}

#[cfg(test)]
mod tests;
