use super::load::{CONFIG_PATH_VAR, config_path_with};
use super::schema::*;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Process environment is global; tests that touch it take this lock.
static ENV: Mutex<()> = Mutex::new(());

/// Holds the environment lock and puts every variable it changed back on drop.
struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    fn set(mut self, key: &'static str, value: Option<&str>) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        // SAFETY: callers hold `ENV`, so no other test reads or writes the
        // environment concurrently.
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            // SAFETY: still under `ENV`.
            unsafe {
                match old {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}

#[test]
fn explicit_config_path_beats_xdg() {
    let p = config_path_with(&[
        (CONFIG_PATH_VAR, "/etc/reelshelf.toml"),
        ("XDG_CONFIG_HOME", "/xdg"),
    ]);
    assert_eq!(p, Some(PathBuf::from("/etc/reelshelf.toml")));
}

#[test]
fn xdg_config_home_beats_home() {
    let p = config_path_with(&[("XDG_CONFIG_HOME", "/xdg"), ("HOME", "/home/u")]);
    assert_eq!(p, Some(PathBuf::from("/xdg/reelshelf/config.toml")));
}

#[test]
fn home_dot_config_is_the_last_resort() {
    let p = config_path_with(&[("XDG_CONFIG_HOME", ""), ("HOME", "/home/u")]);
    assert_eq!(p, Some(PathBuf::from("/home/u/.config/reelshelf/config.toml")));
    assert_eq!(config_path_with(&[]), None);
}

#[test]
fn defaults_describe_a_videos_folder() {
    let s = Settings::default();
    assert_eq!(s.library.directory, PathBuf::from("videos"));
    assert_eq!(s.library.extensions, vec![".mp4", ".avi", ".mov", ".mkv"]);
    assert!(s.library.case_sensitive);
    assert_eq!(s.playback.poll_interval_ms, 500);
    assert_eq!(s.playback.initial_volume, 100);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
directory = "/srv/clips"
extensions = [".mp4", "webm"]
case_sensitive = false

[playback]
poll_interval_ms = 250
initial_volume = 40

[controls]
volume_step = 10
seek_step_percent = 2

[ui]
header_text = "hello"

[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"

[logging]
filter = "reelshelf=debug"
file = "/tmp/reelshelf-test.log"
"#,
    )
    .unwrap();

    let _env = ScopedEnv::new()
        .set(CONFIG_PATH_VAR, cfg_path.to_str())
        .set("REELSHELF__PLAYBACK__POLL_INTERVAL_MS", None);

    let s = Settings::load().unwrap();
    assert_eq!(s.library.directory, PathBuf::from("/srv/clips"));
    assert_eq!(s.library.extensions, vec![".mp4".to_string(), "webm".to_string()]);
    assert!(!s.library.case_sensitive);
    assert_eq!(s.playback.poll_interval_ms, 250);
    assert_eq!(s.playback.initial_volume, 40);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.controls.seek_step_percent, 2);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.tools.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(s.logging.filter, "reelshelf=debug");
    assert_eq!(
        s.logging.file_path(),
        PathBuf::from("/tmp/reelshelf-test.log")
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _env = ScopedEnv::new()
        .set(CONFIG_PATH_VAR, cfg_path.to_str())
        .set("REELSHELF__PLAYBACK__POLL_INTERVAL_MS", Some("100"))
        .set("REELSHELF__LIBRARY__EXTENSIONS", Some(".mp4,.webm"));

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 100);
    assert_eq!(s.library.extensions, vec![".mp4".to_string(), ".webm".to_string()]);
}

#[test]
fn validate_rejects_zero_poll_interval_and_loud_volume() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.initial_volume = 150;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec!["  ".into()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.seek_step_percent = 0;
    assert!(s.validate().is_err());
}
