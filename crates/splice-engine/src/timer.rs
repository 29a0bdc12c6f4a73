//! Periodic reconciliation timer.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

/// Identifies one run of the timer; ticks carry it so the orchestrator can
/// discard ticks from a run that has since been stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct ActiveTimer {
    id: TimerId,
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Fires a callback at a fixed interval on its own thread.
///
/// At most one run is active. `start` while running returns the running id.
pub struct ReconciliationTimer {
    interval: Duration,
    next_id: u64,
    active: Option<ActiveTimer>,
}

impl ReconciliationTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            active: None,
        }
    }

    /// Interval used by the next `start`.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking. `on_tick` returning false stops the thread.
    pub fn start<F>(&mut self, on_tick: F) -> TimerId
    where
        F: Fn(TimerId) -> bool + Send + 'static,
    {
        if let Some(active) = &self.active {
            debug!(timer = ?active.id, "Timer already running");
            return active.id;
        }

        self.next_id += 1;
        let id = TimerId(self.next_id);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let interval = self.interval;

        let handle = thread::spawn(move || tick_loop(id, interval, stop_rx, on_tick));

        debug!(timer = ?id, ?interval, "Timer started");
        self.active = Some(ActiveTimer {
            id,
            stop_tx,
            handle,
        });
        id
    }

    /// Stop ticking and join the thread. Returns false if not running.
    pub fn stop(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        drop(active.stop_tx);
        if active.handle.join().is_err() {
            warn!(timer = ?active.id, "Timer thread panicked");
        }
        debug!(timer = ?active.id, "Timer stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<TimerId> {
        self.active.as_ref().map(|a| a.id)
    }
}

impl Drop for ReconciliationTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn tick_loop<F>(id: TimerId, interval: Duration, stop_rx: Receiver<()>, on_tick: F)
where
    F: Fn(TimerId) -> bool,
{
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if !on_tick(id) {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
