//! Cancellation for the frame loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument};

/// Shared stop flag for the frame loop.
///
/// The loop re-checks the flag before every iteration, so stopping from
/// another handle takes effect within one frame. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the loop end after the current frame.
    #[instrument(skip(self))]
    pub fn stop(&self) {
        debug!("Stop requested");
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}
