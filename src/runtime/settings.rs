use std::env;
use std::path::PathBuf;

use crate::config;

/// Load settings, falling back to defaults. The second value is a warning to
/// log once logging is up, since the log file location itself comes from
/// these settings.
pub fn load_settings() -> (config::Settings, Option<String>) {
    let (mut settings, warning) = match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    };

    if let Some(dir) = env::args_os().nth(1) {
        settings.library.directory = PathBuf::from(dir);
    }

    (settings, warning)
}
