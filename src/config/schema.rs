use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/reelshelf/config.toml` or `~/.config/reelshelf/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `REELSHELF__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub tools: ToolsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder holding the videos, snapshots and recordings. Created on first run.
    pub directory: PathBuf,
    /// Name suffixes treated as video files (a leading dot is added if missing).
    pub extensions: Vec<String>,
    /// Match suffixes case-sensitively (`clip.MP4` is skipped when true).
    pub case_sensitive: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("videos"),
            extensions: vec![".mp4".into(), ".avi".into(), ".mov".into(), ".mkv".into()],
            case_sensitive: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the position poller samples the engine (milliseconds).
    pub poll_interval_ms: u64,
    /// Volume applied at startup, 0..=100.
    pub initial_volume: u8,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            initial_volume: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per `+` / `-` press.
    pub volume_step: u8,
    /// Seek slider change per `H` / `L` press, in percent.
    pub seek_step_percent: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 5,
            seek_step_percent: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Video Analysis ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSettings {
    /// `ffmpeg` binary used for snapshots and recordings.
    pub ffmpeg: PathBuf,
}

impl Default for ToolsSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Log file. The terminal is busy drawing, so logs never go to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "reelshelf=info".to_string(),
            file: None,
        }
    }
}

impl LoggingSettings {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("reelshelf.log"))
    }
}
