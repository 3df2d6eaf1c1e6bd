//! Trigger lifecycle - start the poll loop in the background, stop it later.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::{PollerError, Result};
use crate::poller::{LoopState, PollConfig, PollLoop, PollReport};
use crate::sink::UpdateSink;
use crate::transport::UpdateSource;

/// A configured, not yet started poll trigger
pub struct Trigger<S, K>
where
    S: UpdateSource + 'static,
    K: UpdateSink + 'static,
{
    source: Arc<S>,
    sink: Arc<K>,
    config: PollConfig,
}

impl<S, K> Trigger<S, K>
where
    S: UpdateSource + 'static,
    K: UpdateSink + 'static,
{
    pub fn new(source: Arc<S>, sink: Arc<K>, config: PollConfig) -> Self {
        Self { source, sink, config }
    }

    /// Spawn the poll loop and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> TriggerHandle {
        let state = LoopState::new();
        let poll_loop = PollLoop::new(self.source, self.sink, self.config, state.clone());

        let task = tokio::spawn(poll_loop.run());

        tracing::debug!("Trigger started");
        TriggerHandle {
            state,
            task: Some(task),
        }
    }
}

/// Control handle of a running trigger.
///
/// `stop()` only requests the shutdown; `join()` waits for the loop to
/// unwind and surfaces a fatal error if the loop died on its own.
/// Dropping the handle stops the loop; keep a `state()` clone to stop it
/// later, not to keep it alive.
#[derive(Debug)]
pub struct TriggerHandle {
    state: LoopState,
    // Taken by `join`
    task: Option<JoinHandle<Result<PollReport>>>,
}

impl TriggerHandle {
    /// Request a stop and abort any in-flight poll.
    ///
    /// Idempotent, and harmless after the loop already ended.
    pub fn stop(&self) {
        if self.state.is_running() {
            tracing::debug!("Trigger stop requested");
        }
        self.state.stop();
    }

    /// Shared running flag, for stopping from another context
    pub fn state(&self) -> LoopState {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the loop to end and return its outcome.
    ///
    /// Dropping the returned future before it completes stops the loop.
    pub async fn join(mut self) -> Result<PollReport> {
        let task = self
            .task
            .take()
            .ok_or_else(|| PollerError::TaskFailed("poll task already joined".to_string()))?;
        match task.await {
            Ok(result) => result,
            Err(e) => Err(PollerError::TaskFailed(e.to_string())),
        }
    }

    /// Stop, then wait for the loop to unwind
    pub async fn stop_and_join(self) -> Result<PollReport> {
        self.stop();
        self.join().await
    }
}

impl Drop for TriggerHandle {
    fn drop(&mut self) {
        if self.state.is_running() && self.task.as_ref().is_some_and(|t| !t.is_finished()) {
            tracing::debug!("Trigger handle dropped, stopping poll loop");
        }
        self.state.stop();
    }
}
