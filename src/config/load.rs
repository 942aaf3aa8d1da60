use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File};

use super::schema::Settings;

/// Explicit config file location; beats the XDG lookup.
pub(super) const CONFIG_PATH_VAR: &str = "REELSHELF_CONFIG_PATH";
const ENV_PREFIX: &str = "REELSHELF";

impl Settings {
    /// Layer struct defaults, the optional TOML file and `REELSHELF__*`
    /// variables (highest wins) into one `Settings`.
    pub fn load() -> Result<Self, ConfigError> {
        sources(resolve_config_path().as_deref())
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let playback = &self.playback;
        let checks = [
            (playback.poll_interval_ms == 0, "playback.poll_interval_ms must be >= 1"),
            (playback.initial_volume > 100, "playback.initial_volume must be within 0..=100"),
            (
                self.library.extensions.iter().all(|e| e.trim().is_empty()),
                "library.extensions must name at least one extension",
            ),
            (
                !(1..=100).contains(&self.controls.seek_step_percent),
                "controls.seek_step_percent must be within 1..=100",
            ),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, msg)) => Err((*msg).to_string()),
            None => Ok(()),
        }
    }
}

fn sources(file: Option<&Path>) -> ConfigBuilder<DefaultState> {
    let builder = Config::builder();
    let builder = match file {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    };
    // `REELSHELF__LIBRARY__EXTENSIONS=.mp4,.webm` sets a list.
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("library.extensions")
            .try_parsing(true),
    )
}

/// The config file to read, if any location can be worked out.
fn resolve_config_path() -> Option<PathBuf> {
    config_path_from(|key| env::var_os(key))
}

/// `REELSHELF_CONFIG_PATH`, else `$XDG_CONFIG_HOME/reelshelf/config.toml`,
/// else `$HOME/.config/reelshelf/config.toml`. Empty variables count as unset.
fn config_path_from(lookup: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(explicit) = var(CONFIG_PATH_VAR) {
        return Some(explicit);
    }
    var("XDG_CONFIG_HOME")
        .or_else(|| var("HOME").map(|home| home.join(".config")))
        .map(|base| base.join("reelshelf").join("config.toml"))
}

#[cfg(test)]
pub(super) fn config_path_with(vars: &[(&str, &str)]) -> Option<PathBuf> {
    config_path_from(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| OsString::from(*v))
    })
}
