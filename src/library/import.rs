use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::model::LibraryEntry;
use super::scan::is_video_name;

/// Move `source` into the library folder `dir` under its own file name.
///
/// This relocates the file; it is not a copy. An existing entry with the same
/// name is never overwritten: the call fails with `DuplicateEntry` and both
/// files are left alone.
pub fn import_file(source: &Path, dir: &Path, settings: &LibrarySettings) -> Result<LibraryEntry> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::UnsupportedFile(source.to_path_buf()))?;
    if !is_video_name(name, settings) {
        return Err(Error::UnsupportedFile(source.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::DirectoryMissing(dir.to_path_buf()));
    }

    let entry = LibraryEntry::new(dir, name);
    let exists = entry
        .path
        .try_exists()
        .map_err(|e| Error::io("check import destination", e))?;
    if exists {
        warn!(dest = %entry.path.display(), "import refused, entry already exists");
        return Err(Error::DuplicateEntry(entry.path));
    }

    move_file(source, &entry.path)?;
    info!(from = %source.display(), to = %entry.path.display(), "imported video");
    Ok(entry)
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // rename(2) cannot cross filesystems; fall back to copy + unlink.
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(|e| Error::io("copy video into library", e))?;
            if let Err(e) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(Error::io("remove imported source", e));
            }
            Ok(())
        }
        Err(e) => Err(Error::io("move video into library", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn import_moves_the_file_into_the_library() {
        let lib = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let src = outside.path().join("clip.mp4");
        fs::write(&src, b"frames").unwrap();

        let entry = import_file(&src, lib.path(), &LibrarySettings::default()).unwrap();

        assert_eq!(entry.name, "clip.mp4");
        assert_eq!(entry.path, lib.path().join("clip.mp4"));
        assert!(!src.exists());
        assert_eq!(fs::read(&entry.path).unwrap(), b"frames");
    }

    #[test]
    fn import_never_overwrites_an_existing_entry() {
        let lib = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let existing = lib.path().join("clip.mp4");
        fs::write(&existing, b"original").unwrap();
        let src = outside.path().join("clip.mp4");
        fs::write(&src, b"newcomer").unwrap();

        let err = import_file(&src, lib.path(), &LibrarySettings::default()).unwrap_err();

        assert!(matches!(err, Error::DuplicateEntry(ref p) if *p == existing));
        assert_eq!(err.to_string(), "Video already exists in the folder");
        assert_eq!(fs::read(&existing).unwrap(), b"original");
        assert_eq!(fs::read(&src).unwrap(), b"newcomer");
    }

    #[test]
    fn import_rejects_unrecognized_files() {
        let lib = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let src = outside.path().join("notes.txt");
        fs::write(&src, b"text").unwrap();

        let err = import_file(&src, lib.path(), &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFile(_)));
        assert!(src.exists());
    }

    #[test]
    fn import_of_missing_source_is_an_io_error() {
        let lib = tempdir().unwrap();
        let src = lib.path().join("elsewhere").join("ghost.mp4");
        let err = import_file(&src, lib.path(), &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
