//! Simulation clock with an injectable time source.
//!
//! The render loop owns the clock and hands elapsed seconds to the
//! waveform models. Elapsed time never runs backwards, and waveform values
//! depend only on it, never on how many frames were drawn.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic source of "now", in seconds from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> f64;
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven time source for deterministic tests and offline dumps.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to a [`SimulationClock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Elapsed simulation time since the last (re)mount.
#[derive(Debug)]
pub struct SimulationClock<S> {
    source: S,
    start: f64,
    paused_total: f64,
    paused_at: Option<f64>,
    last: Cell<f64>,
}

impl<S: TimeSource> SimulationClock<S> {
    pub fn new(source: S) -> Self {
        let start = source.now();
        Self {
            source,
            start,
            paused_total: 0.0,
            paused_at: None,
            last: Cell::new(0.0),
        }
    }

    /// Seconds since start, excluding paused spans. Never decreases.
    pub fn elapsed(&self) -> f64 {
        if let Some(frozen) = self.paused_at {
            return frozen;
        }
        let raw = self.source.now() - self.start - self.paused_total;
        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        let elapsed = raw.max(self.last.get());
        self.last.set(elapsed);
        elapsed
    }

    /// Freeze elapsed time at its current value.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(self.elapsed());
        }
    }

    /// Continue from where [`pause`](Self::pause) froze the clock.
    pub fn resume(&mut self) {
        if let Some(frozen) = self.paused_at.take() {
            self.paused_total = self.source.now() - self.start - frozen;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Restart from zero, as on remount.
    pub fn reset(&mut self) {
        self.start = self.source.now();
        self.paused_total = 0.0;
        self.paused_at = None;
        self.last.set(0.0);
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
