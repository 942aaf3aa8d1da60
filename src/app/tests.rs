use super::*;
use crate::config::{ControlsSettings, LibrarySettings};
use crate::engine::fake::{Call, FakeEngine};
use crate::engine::{Media, OutputHandle};
use crate::library::LibraryIndex;
use crate::session::PlaybackSession;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn app_with(names: &[&str]) -> (TempDir, Arc<FakeEngine>, App<FakeEngine>) {
    let dir = tempfile::tempdir().unwrap();
    for n in names {
        fs::write(dir.path().join(n), b"").unwrap();
    }
    let settings = LibrarySettings {
        directory: dir.path().to_path_buf(),
        ..LibrarySettings::default()
    };
    let library = LibraryIndex::open(&settings).unwrap();
    let engine = Arc::new(FakeEngine::new());
    let session = PlaybackSession::new(
        engine.clone(),
        dir.path().to_path_buf(),
        OutputHandle::Detached,
        Duration::from_millis(5),
    )
    .with_clock(|| 1_700_000_000);
    let app = App::new(library, session, &ControlsSettings::default());
    (dir, engine, app)
}

#[test]
fn empty_search_shows_the_literal_warning() {
    let (_dir, _engine, mut app) = app_with(&["a.mp4"]);
    app.begin_search();
    app.push_input(' ');
    app.submit_input();

    let modal = app.modal.clone().unwrap();
    assert_eq!(modal.kind, ModalKind::Warning);
    assert_eq!(modal.text, "Enter a video name to search");
    assert_eq!(app.mode, InputMode::Normal);
    app.close_modal();
    assert!(app.modal.is_none());
}

#[test]
fn search_narrows_and_clear_restores() {
    let (_dir, _engine, mut app) = app_with(&["a.mp4", "b.avi", "notes.txt"]);
    app.begin_search();
    for c in "B".chars() {
        app.push_input(c);
    }
    app.submit_input();

    let names: Vec<&str> = app.library.visible().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["b.avi"]);
    assert_eq!(app.selected, 0);

    app.clear_search();
    assert_eq!(app.library.visible().len(), 2);
}

#[test]
fn transport_is_ignored_until_a_video_is_selected() {
    let (_dir, engine, mut app) = app_with(&["a.mp4"]);
    app.play();
    app.toggle_pause();
    app.stop();
    app.next();
    app.snapshot();
    assert!(engine.calls().is_empty());
    assert!(app.modal.is_none());
}

#[test]
fn double_click_then_play_runs_the_entry_under_the_cursor() {
    let (dir, engine, mut app) = app_with(&["a.mp4"]);
    app.activate_selected();
    app.play();

    assert_eq!(
        engine.calls()[0],
        Call::Load(Media::from_path(dir.path().join("a.mp4")))
    );
    assert!(app.session.controls().stop);
    app.shutdown();
}

#[test]
fn duplicate_import_shows_the_literal_error() {
    let (_dir, _engine, mut app) = app_with(&["a.mp4"]);
    let outside = tempfile::tempdir().unwrap();
    let src = outside.path().join("a.mp4");
    fs::write(&src, b"").unwrap();

    app.begin_import();
    for c in src.display().to_string().chars() {
        app.push_input(c);
    }
    app.submit_input();

    let modal = app.modal.clone().unwrap();
    assert_eq!(modal.kind, ModalKind::Error);
    assert_eq!(modal.text, "Video already exists in the folder");
    assert!(src.exists());
}

#[test]
fn import_moves_the_cursor_to_the_new_entry() {
    let (dir, _engine, mut app) = app_with(&["a.mp4"]);
    let outside = tempfile::tempdir().unwrap();
    let src = outside.path().join("z.mkv");
    fs::write(&src, b"").unwrap();

    app.add_video(src.clone());

    assert!(app.modal.is_none());
    assert_eq!(app.library.visible()[app.selected].name, "z.mkv");
    assert!(Path::new(&dir.path().join("z.mkv")).exists());
    assert!(!src.exists());
}

#[test]
fn snapshot_and_recording_report_their_paths() {
    let (dir, _engine, mut app) = app_with(&["a.mp4"]);
    app.activate_selected();

    app.snapshot();
    let modal = app.modal.take().unwrap();
    assert_eq!(modal.title, "Snapshot Taken");
    assert_eq!(
        modal.text,
        format!("Snapshot saved as:\n{}", dir.path().join("snapshot_1700000000.png").display())
    );

    app.toggle_recording();
    let modal = app.modal.take().unwrap();
    assert_eq!(
        modal.text,
        format!("Recording to: {}", dir.path().join("recorded_1700000000.mp4").display())
    );
    assert_eq!(app.session.controls().record_label.as_str(), "Stop Recording");

    app.toggle_recording();
    let modal = app.modal.take().unwrap();
    assert_eq!(modal.title, "Recording Stopped");
    assert!(!app.session.is_recording());
}

#[test]
fn next_moves_the_cursor_with_playback() {
    let (_dir, _engine, mut app) = app_with(&["a.mp4", "b.mp4"]);
    app.activate_selected();
    let first = app.session.current_path().map(Path::to_path_buf);

    app.next();

    assert_eq!(app.selected, 1);
    assert_ne!(app.session.current_path().map(Path::to_path_buf), first);
    app.shutdown();
}

#[test]
fn volume_steps_stay_within_range() {
    let (_dir, engine, mut app) = app_with(&[]);
    app.volume_up();
    assert_eq!(app.session.volume(), 100);
    app.volume_down();
    assert_eq!(app.session.volume(), 95);
    assert_eq!(engine.calls(), vec![Call::SetVolume(100), Call::SetVolume(95)]);
}

#[test]
fn seek_keys_release_the_slider_at_a_percentage() {
    let (_dir, engine, mut app) = app_with(&[]);
    engine.set_length(200_000);
    app.seek_to_percent(30);
    app.nudge_seek(true);
    assert_eq!(engine.calls(), vec![Call::SetTime(60_000), Call::SetTime(10_000)]);
}

#[test]
fn cursor_wraps_around_the_visible_list() {
    let (_dir, _engine, mut app) = app_with(&["a.mp4", "b.mp4", "c.mp4"]);
    app.cursor_up();
    assert_eq!(app.selected, 2);
    app.cursor_down();
    assert_eq!(app.selected, 0);
}
