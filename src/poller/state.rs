//! Loop state shared between the poll task and its controller

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Running flag of one poll loop.
///
/// Clones share the flag. A fresh state is running; `stop()` flips it for
/// good and wakes anything waiting in [`LoopState::stopped`].
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    token: CancellationToken,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Request a stop. Idempotent.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Resolves once a stop has been requested
    pub fn stopped(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
