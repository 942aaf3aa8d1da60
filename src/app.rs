//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the library, the playback
//! session, the list cursor and the on-screen prompt or message.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
