//! Session metrics collection.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;

use splice_ipc::SessionStats;

/// Collects counters for one playback session.
pub struct SessionMetrics {
    generation: AtomicU64,
    start_time: RwLock<Option<Instant>>,
    ticks: AtomicU64,
    surface_handoffs: AtomicU64,
    ignored_transitions: AtomicU64,
    stale_signals: AtomicU64,
    ad_played: AtomicBool,
}

impl SessionMetrics {
    /// Create a collector for the session with `generation`.
    pub fn new(generation: u64) -> Self {
        Self {
            generation: AtomicU64::new(generation),
            start_time: RwLock::new(None),
            ticks: AtomicU64::new(0),
            surface_handoffs: AtomicU64::new(0),
            ignored_transitions: AtomicU64::new(0),
            stale_signals: AtomicU64::new(0),
            ad_played: AtomicBool::new(false),
        }
    }

    /// Start the uptime clock.
    pub fn start(&self) {
        *self.start_time.write() = Some(Instant::now());
    }

    /// Stop the uptime clock.
    pub fn stop(&self) {
        *self.start_time.write() = None;
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handoff(&self) {
        self.surface_handoffs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_transition(&self) {
        self.ignored_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_signal(&self) {
        self.stale_signals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mark_ad_played(&self) {
        self.ad_played.store(true, Ordering::Relaxed);
    }

    /// Current counters.
    pub fn snapshot(&self) -> SessionStats {
        let uptime_seconds = self
            .start_time
            .read()
            .map(|s| s.elapsed().as_secs())
            .unwrap_or(0);

        SessionStats {
            generation: self.generation.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            surface_handoffs: self.surface_handoffs.load(Ordering::Relaxed),
            ignored_transitions: self.ignored_transitions.load(Ordering::Relaxed),
            stale_signals: self.stale_signals.load(Ordering::Relaxed),
            ad_played: self.ad_played.load(Ordering::Relaxed),
            uptime_seconds,
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}
