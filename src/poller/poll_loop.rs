//! Poll loop - request, advance the cursor, filter, emit, repeat.
//!
//! Iterations are strictly sequential: the next request is only built
//! once the previous answer has been fully processed, so at most one
//! request is in flight and batches are emitted in remote id order.

use std::sync::Arc;

use crate::error::Result;
use crate::filter::filter_updates;
use crate::poller::cursor::PollCursor;
use crate::poller::poll_config::PollConfig;
use crate::poller::state::LoopState;
use crate::sink::UpdateSink;
use crate::transport::{PollResponse, UpdateSource};

/// Summary of one loop run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Cursor value when the loop ended
    pub next_offset: i64,
    /// Requests issued to the remote
    pub polls: u64,
    /// Batches handed to the sink (empty batches included)
    pub batches_emitted: u64,
    /// Updates received before filtering
    pub updates_received: u64,
}

/// Long-poll loop over one update source.
///
/// Owns the cursor; only a successful, non-empty answer moves it.
pub struct PollLoop<S, K>
where
    S: UpdateSource,
    K: UpdateSink,
{
    source: Arc<S>,
    sink: Arc<K>,
    config: PollConfig,
    state: LoopState,
    cursor: PollCursor,
    report: PollReport,
}

impl<S, K> PollLoop<S, K>
where
    S: UpdateSource,
    K: UpdateSink,
{
    pub fn new(source: Arc<S>, sink: Arc<K>, config: PollConfig, state: LoopState) -> Self {
        let cursor = PollCursor::new(config.offset);
        Self {
            source,
            sink,
            config,
            state,
            cursor,
            report: PollReport {
                next_offset: cursor.next_offset(),
                ..Default::default()
            },
        }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn report(&self) -> &PollReport {
        &self.report
    }

    /// Poll until stopped or a fatal error.
    ///
    /// A stop interrupts a request that is still waiting on the remote. A
    /// 409 conflict that arrives after a stop was requested is the remote
    /// noticing the shutdown and ends the loop cleanly; any other error,
    /// including a 409 while still running, is returned.
    pub async fn run(mut self) -> Result<PollReport> {
        tracing::info!(
            offset = self.cursor.next_offset(),
            limit = self.config.limit,
            timeout = self.config.timeout,
            updates = %self.config.selection,
            "Polling started"
        );

        while self.state.is_running() {
            let request = self.config.request(self.cursor.next_offset());
            self.report.polls += 1;

            let result = tokio::select! {
                biased;
                result = self.source.get_updates(&request) => result,
                _ = self.state.stopped() => {
                    tracing::debug!(offset = request.offset, "Stop requested, abandoning in-flight poll");
                    break;
                }
            };

            match result {
                Ok(response) => {
                    self.handle_response(response);
                }
                Err(e) if e.is_conflict() && !self.state.is_running() => {
                    tracing::debug!(error = %e, "409 conflict while stopping");
                }
                Err(e) => {
                    tracing::error!(offset = request.offset, error = %e, "Polling failed");
                    return Err(e);
                }
            }
        }

        tracing::info!(
            next_offset = self.report.next_offset,
            polls = self.report.polls,
            batches = self.report.batches_emitted,
            "Polling stopped"
        );
        Ok(self.report)
    }

    /// Process one successful answer; returns the emitted batch size.
    ///
    /// `ok: false`, a missing result and an empty result are all "nothing
    /// this cycle": no advance, no emission. A non-empty result always
    /// advances the cursor and emits exactly once, even when the filter
    /// leaves nothing.
    pub fn handle_response(&mut self, response: PollResponse) -> Option<usize> {
        if !response.ok {
            tracing::debug!(description = ?response.description, "Remote answered ok=false");
            return None;
        }

        let updates = response.result?;
        let last_id = updates.last()?.update_id;

        let next_offset = self.cursor.advance_past(last_id);
        self.report.next_offset = next_offset;
        self.report.updates_received += updates.len() as u64;

        let received = updates.len();
        let batch = filter_updates(updates, &self.config.selection);
        let emitted = batch.len();

        tracing::debug!(received, emitted, next_offset, "Emitting batch");
        self.sink.emit(batch);
        self.report.batches_emitted += 1;

        Some(emitted)
    }
}
