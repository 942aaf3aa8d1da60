//! Native video output handles.
//!
//! The engine draws into a window owned by the shell. What that handle is
//! depends on the host platform, so the kind is picked at compile time.

use std::env;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputHandle {
    /// X11 window id (Linux).
    X11Window(u32),
    /// `HWND` (Windows).
    Hwnd(isize),
    /// `NSView` pointer (macOS).
    NsView(usize),
    /// No native surface available.
    Detached,
}

impl OutputHandle {
    /// Wrap a raw window id in the handle kind the host OS expects.
    pub fn for_host(raw: u64) -> Self {
        if raw == 0 {
            Self::Detached
        } else if cfg!(target_os = "linux") {
            u32::try_from(raw).map_or(Self::Detached, Self::X11Window)
        } else if cfg!(target_os = "windows") {
            isize::try_from(raw).map_or(Self::Detached, Self::Hwnd)
        } else if cfg!(target_os = "macos") {
            usize::try_from(raw).map_or(Self::Detached, Self::NsView)
        } else {
            Self::Detached
        }
    }

    /// The window hosting this terminal, when the emulator exports `WINDOWID`.
    pub fn from_terminal() -> Self {
        env::var("WINDOWID")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(Self::Detached, Self::for_host)
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::Detached)
    }
}
