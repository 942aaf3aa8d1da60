//! Snapshot and recording helpers backed by the `ffmpeg` CLI.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Arguments for grabbing one still frame at `at`. A zero width or height
/// keeps the source size.
pub(super) fn snapshot_args(
    source: &Path,
    at: Duration,
    dest: &Path,
    width: u32,
    height: u32,
) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", at.as_secs_f64()),
        "-i".to_string(),
        source.display().to_string(),
        "-frames:v".to_string(),
        "1".to_string(),
    ];
    if width > 0 || height > 0 {
        let w = if width > 0 { width.to_string() } else { "-1".to_string() };
        let h = if height > 0 { height.to_string() } else { "-1".to_string() };
        args.push("-vf".to_string());
        args.push(format!("scale={w}:{h}"));
    }
    args.push("-y".to_string());
    args.push(dest.display().to_string());
    args
}

pub(super) fn grab_frame(
    ffmpeg: &Path,
    source: &Path,
    at: Duration,
    dest: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    let output = Command::new(ffmpeg)
        .args(snapshot_args(source, at, dest, width, height))
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::engine(format!("cannot run {}: {e}", ffmpeg.display())))?;

    if !output.status.success() {
        return Err(Error::engine(format!(
            "snapshot failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// Arguments for a real-time stream copy of `source` into `dest`.
pub(super) fn record_args(source: &Path, dest: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-re".to_string(),
        "-i".to_string(),
        source.display().to_string(),
        "-c".to_string(),
        "copy".to_string(),
        // Never overwrite: an existing file makes ffmpeg exit instead.
        "-n".to_string(),
        dest.display().to_string(),
    ]
}

/// A running stream-copy process. Reads the source at its native rate, so the
/// file grows while the media plays.
pub(super) struct Recorder {
    child: Child,
    dest: PathBuf,
}

impl Recorder {
    pub(super) fn start(ffmpeg: &Path, source: &Path, dest: &Path) -> Result<Self> {
        let child = Command::new(ffmpeg)
            .args(record_args(source, dest))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::engine(format!("cannot run {}: {e}", ffmpeg.display())))?;
        debug!(dest = %dest.display(), "recorder started");
        Ok(Self {
            child,
            dest: dest.to_path_buf(),
        })
    }

    /// Ask ffmpeg to finish the file (`q` on stdin), then wait for it.
    pub(super) fn finish(mut self) {
        if let Some(stdin) = self.child.stdin.as_mut() {
            let _ = stdin.write_all(b"q");
        }
        drop(self.child.stdin.take());
        match self.child.wait() {
            Ok(status) if status.success() => {
                debug!(dest = %self.dest.display(), "recorder finished");
            }
            Ok(status) => warn!(dest = %self.dest.display(), %status, "recorder exited with failure"),
            Err(e) => warn!(dest = %self.dest.display(), "recorder wait failed: {e}"),
        }
    }
}
