use super::*;
use std::fs;
use tempfile::tempdir;

fn settings_for(dir: &Path) -> LibrarySettings {
    LibrarySettings {
        directory: dir.to_path_buf(),
        ..LibrarySettings::default()
    }
}

fn names(entries: &[LibraryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn open_creates_the_folder_eagerly() {
    let root = tempdir().unwrap();
    let dir = root.path().join("videos");
    let index = LibraryIndex::open(&settings_for(&dir)).unwrap();
    assert!(dir.is_dir());
    assert!(index.entries().is_empty());
}

#[test]
fn search_then_clear_restores_the_full_list() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"").unwrap();
    fs::write(dir.path().join("b.avi"), b"").unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();

    let mut index = LibraryIndex::open(&settings_for(dir.path())).unwrap();
    assert_eq!(index.visible().len(), 2);

    assert_eq!(names(index.search("B").unwrap()), vec!["b.avi"]);
    assert_eq!(index.query(), Some("B"));
    assert_eq!(names(index.visible()), vec!["b.avi"]);
    assert_eq!(index.entries().len(), 2);

    // A second search runs against the full result, not the narrowed view.
    assert_eq!(names(index.search("a.mp4").unwrap()), vec!["a.mp4"]);

    index.clear_search();
    assert_eq!(index.visible().len(), 2);
    assert_eq!(index.query(), None);
}

#[test]
fn empty_search_keeps_the_current_view() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"").unwrap();
    fs::write(dir.path().join("b.avi"), b"").unwrap();

    let mut index = LibraryIndex::open(&settings_for(dir.path())).unwrap();
    index.search("a").unwrap();
    assert!(matches!(index.search(" "), Err(Error::EmptyQuery)));
    assert_eq!(names(index.visible()), vec!["a.mp4"]);
}

#[test]
fn rescan_of_a_vanished_folder_is_empty() {
    let root = tempdir().unwrap();
    let dir = root.path().join("videos");
    let mut index = LibraryIndex::open(&settings_for(&dir)).unwrap();
    fs::write(dir.join("a.mp4"), b"").unwrap();
    assert_eq!(index.rescan().len(), 1);

    fs::remove_dir_all(&dir).unwrap();
    assert!(index.rescan().is_empty());
}

#[test]
fn import_rescans_and_drops_the_search() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"").unwrap();
    let src = outside.path().join("fresh.mkv");
    fs::write(&src, b"").unwrap();

    let mut index = LibraryIndex::open(&settings_for(dir.path())).unwrap();
    index.search("a").unwrap();

    let entry = index.import(&src).unwrap();
    assert_eq!(entry.name, "fresh.mkv");
    assert_eq!(index.query(), None);
    assert!(index.visible().iter().any(|e| e.name == "fresh.mkv"));
    assert_eq!(index.visible().len(), 2);
}

#[test]
fn duplicate_import_leaves_the_index_unchanged() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(dir.path().join("a.mp4"), b"keep").unwrap();
    let src = outside.path().join("a.mp4");
    fs::write(&src, b"other").unwrap();

    let mut index = LibraryIndex::open(&settings_for(dir.path())).unwrap();
    assert!(matches!(index.import(&src), Err(Error::DuplicateEntry(_))));
    assert_eq!(names(index.entries()), vec!["a.mp4"]);
    assert!(src.exists());
}
