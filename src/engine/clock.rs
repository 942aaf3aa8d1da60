use std::time::{Duration, Instant};

/// Elapsed-time bookkeeping for a sink that can be paused and restarted at an offset.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    /// Reset to `offset`, running or not.
    pub(crate) fn reset(&mut self, offset: Duration, running: bool) {
        self.accumulated = offset;
        self.started_at = running.then(Instant::now);
    }

    pub(crate) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(crate) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }
}
