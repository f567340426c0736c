//! ---
//! wbc_section: "01-core-functionality"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Blocking publication pacing with a virtual clock for tests."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

/// Blocking wait used between coupled controller publications.
///
/// Calls block the caller until the pause has elapsed and are not cancellable.
pub trait Pacer: Send + Sync {
    /// Block for `duration`.
    fn pause(&self, duration: Duration);
}

/// Pacer backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        trace!(pause_ms = duration.as_millis() as u64, "pacing publication");
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Default)]
struct ClockState {
    elapsed: Duration,
    pauses: Vec<Duration>,
}

/// Deterministic pacer that advances a virtual clock instead of sleeping.
#[derive(Debug, Default)]
pub struct VirtualClock {
    state: Mutex<ClockState>,
}

impl VirtualClock {
    /// Clock starting at zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time elapsed.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed
    }

    /// Every pause requested so far, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.state.lock().pauses.clone()
    }

    /// Advance the clock without recording a pause.
    pub fn advance(&self, duration: Duration) {
        self.state.lock().elapsed += duration;
    }
}

impl Pacer for VirtualClock {
    fn pause(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.elapsed += duration;
        state.pauses.push(duration);
    }
}
