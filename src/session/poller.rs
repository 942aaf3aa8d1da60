//! Background position sampling for the progress gauge.
//!
//! Each `start` bumps a generation counter and spawns one thread tagged with
//! the new generation. A thread exits as soon as its generation is stale or
//! the engine reaches a terminal state. Publishing re-checks the generation
//! under the progress lock, and `cancel` bumps it under the same lock, so no
//! superseded thread can write after `start`/`cancel` returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::engine::MediaEngine;

/// What the gauge shows: playback position as a fraction of the media length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub fraction: f64,
}

impl Progress {
    /// Gauge value in 0..=100.
    pub fn percent(&self) -> u8 {
        (self.fraction.clamp(0.0, 1.0) * 100.0) as u8
    }
}

pub type ProgressHandle = Arc<Mutex<Progress>>;

pub struct Poller {
    generation: Arc<AtomicU64>,
    progress: ProgressHandle,
    interval: Duration,
    worker: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            progress: Arc::new(Mutex::new(Progress::default())),
            interval,
            worker: None,
        }
    }

    pub fn progress(&self) -> ProgressHandle {
        self.progress.clone()
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Supersede any running poller and start a new one for `engine`.
    pub fn start<E: MediaEngine + 'static>(&mut self, engine: Arc<E>) -> u64 {
        let my_gen = self.bump();
        let generation = self.generation.clone();
        let progress = self.progress.clone();
        let interval = self.interval;

        debug!(generation = my_gen, "poller started");
        self.worker = Some(thread::spawn(move || {
            poll_loop(&*engine, my_gen, &generation, &progress, interval);
        }));
        my_gen
    }

    /// Invalidate the running poller, if any. It exits on its next wake-up.
    pub fn cancel(&mut self) {
        let stale = self.bump();
        debug!(generation = stale, "poller cancelled");
        self.worker = None;
    }

    /// Whether the most recently started poller thread is still running.
    pub fn is_active(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    fn bump(&self) -> u64 {
        let _guard = self.progress.lock();
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn poll_loop<E: MediaEngine + ?Sized>(
    engine: &E,
    my_gen: u64,
    generation: &AtomicU64,
    progress: &Mutex<Progress>,
    interval: Duration,
) {
    loop {
        if generation.load(Ordering::SeqCst) != my_gen {
            debug!(generation = my_gen, "poller superseded");
            return;
        }
        let state = engine.state();
        if state.is_terminal() {
            debug!(generation = my_gen, ?state, "poller finished");
            return;
        }

        let length = engine.length_ms();
        if length > 0 {
            let fraction = engine.time_ms() as f64 / length as f64;
            if let Ok(mut p) = progress.lock() {
                if generation.load(Ordering::SeqCst) != my_gen {
                    return;
                }
                p.fraction = fraction.clamp(0.0, 1.0);
            }
        }

        thread::sleep(interval);
    }
}
