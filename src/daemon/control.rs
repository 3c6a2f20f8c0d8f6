//! Stop and run-now triggers
//!
//! Explicit trigger tokens for the scheduler's decision point, replacing
//! ambient process-wide signal flags. Repeated refresh requests arriving
//! before the next scheduling check coalesce into a single cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

struct ControlState {
    stop: AtomicBool,
    refresh: AtomicBool,
    wake: Notify,
}

/// Cloneable handle raising triggers against a running daemon.
///
/// The embedding process wires its signal handling (or RPC surface) to
/// these methods; the scheduler consumes the flags once per tick.
#[derive(Clone)]
pub struct ControlHandle {
    state: Arc<ControlState>,
}

impl ControlHandle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ControlState {
                stop: AtomicBool::new(false),
                refresh: AtomicBool::new(false),
                wake: Notify::new(),
            }),
        }
    }

    /// Request the daemon stop after the current cycle completes
    pub fn request_stop(&self) {
        self.state.stop.store(true, Ordering::Release);
        self.state.wake.notify_one();
    }

    /// Request an out-of-band reconciliation cycle
    pub fn request_refresh(&self) {
        self.state.refresh.store(true, Ordering::Release);
        self.state.wake.notify_one();
    }

    pub fn stop_requested(&self) -> bool {
        self.state.stop.load(Ordering::Acquire)
    }

    /// Consume the refresh flag; clears it so queued-up triggers collapse
    /// into the one cycle that is about to run.
    pub fn take_refresh(&self) -> bool {
        self.state.refresh.swap(false, Ordering::AcqRel)
    }

    /// Wait until a trigger wakes the scheduler. A trigger raised while
    /// nobody is waiting is retained and wakes the next waiter immediately.
    pub async fn wait_for_wake(&self) {
        self.state.wake.notified().await;
    }
}

impl Default for ControlHandle {
    fn default() -> Self {
        Self::new()
    }
}
