use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::model::LibraryEntry;

/// Normalized suffix list: trimmed, dot-prefixed, lowercased unless matching is case-sensitive.
fn suffixes(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| {
            let dotted = if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{e}")
            };
            if settings.case_sensitive {
                dotted
            } else {
                dotted.to_lowercase()
            }
        })
        .collect()
}

/// Whether `name` ends in one of the configured video suffixes.
pub fn is_video_name(name: &str, settings: &LibrarySettings) -> bool {
    let name = if settings.case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    };
    suffixes(settings).iter().any(|s| name.ends_with(s.as_str()))
}

/// List the video files directly inside `dir`, in directory enumeration order.
///
/// Fails with `DirectoryMissing` when `dir` is not a directory.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<LibraryEntry>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryMissing(dir.to_path_buf()));
    }

    let mut entries: Vec<LibraryEntry> = Vec::new();

    // The library is a single folder: depth 1 only, no sorting so the
    // filesystem order survives.
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("skipping unreadable library entry: {err}");
                None
            }
        })
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            debug!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if is_video_name(name, settings) {
            entries.push(LibraryEntry::new(dir, name));
        }
    }

    info!(dir = %dir.display(), count = entries.len(), "scanned library");
    Ok(entries)
}
