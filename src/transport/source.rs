//! Update source trait and the getUpdates wire types

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Update;
use crate::error::Result;
use crate::poller::LoopState;

/// One long-poll call against the remote queue.
///
/// Implementations hold no state between calls. Dropping the returned
/// future must abort the request, which is how a stop interrupts a poll
/// that is still waiting on the remote side.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    async fn get_updates(&self, request: &GetUpdatesRequest) -> Result<PollResponse>;
}

/// JSON body of a getUpdates call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub limit: u32,
    pub timeout: u32,
    pub allowed_updates: Vec<String>,
}

/// JSON answer of a getUpdates call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    pub ok: bool,
    /// Ordered by ascending `update_id` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Update>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PollResponse {
    /// Successful answer carrying these updates
    pub fn updates(updates: Vec<Update>) -> Self {
        Self {
            ok: true,
            result: Some(updates),
            description: None,
        }
    }

    /// Successful answer with no `result` field
    pub fn no_result() -> Self {
        Self {
            ok: true,
            result: None,
            description: None,
        }
    }

    /// Answer flagged `ok: false`
    pub fn not_ok(description: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            description: Some(description.into()),
        }
    }
}

/// A scripted step for [`MockUpdateSource`]
#[derive(Debug)]
pub enum MockStep {
    /// Answer with this result
    Reply(Result<PollResponse>),
    /// Request a stop on the attached loop state, then answer
    StopThen(Result<PollResponse>),
}

/// Scripted update source for tests.
///
/// Replays its steps in order and records every request. Once the script
/// is exhausted it stops the attached [`LoopState`] (if any) and answers
/// with no result; without one it never answers, like a long poll that
/// only a stop can interrupt.
#[derive(Debug, Default)]
pub struct MockUpdateSource {
    steps: Mutex<VecDeque<MockStep>>,
    requests: Mutex<Vec<GetUpdatesRequest>>,
    state: Option<LoopState>,
}

impl MockUpdateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop this loop state when the script runs out
    pub fn stopping(mut self, state: LoopState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn push(self, step: MockStep) -> Self {
        self.lock_steps().push_back(step);
        self
    }

    pub fn push_response(self, response: PollResponse) -> Self {
        self.push(MockStep::Reply(Ok(response)))
    }

    pub fn push_error(self, error: crate::error::PollerError) -> Self {
        self.push(MockStep::Reply(Err(error)))
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<GetUpdatesRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn lock_steps(&self) -> std::sync::MutexGuard<'_, VecDeque<MockStep>> {
        self.steps
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UpdateSource for MockUpdateSource {
    async fn get_updates(&self, request: &GetUpdatesRequest) -> Result<PollResponse> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());

        let step = self.lock_steps().pop_front();
        match step {
            Some(MockStep::Reply(result)) => result,
            Some(MockStep::StopThen(result)) => {
                if let Some(state) = &self.state {
                    state.stop();
                }
                result
            }
            None => match &self.state {
                Some(state) => {
                    state.stop();
                    Ok(PollResponse::no_result())
                }
                None => std::future::pending().await,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollerError;
    use serde_json::json;

    fn request(offset: i64) -> GetUpdatesRequest {
        GetUpdatesRequest {
            offset,
            limit: 100,
            timeout: 0,
            allowed_updates: vec![],
        }
    }

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(GetUpdatesRequest {
            offset: -1,
            limit: 10,
            timeout: 30,
            allowed_updates: vec!["message".to_string()],
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "offset": -1, "limit": 10, "timeout": 30, "allowed_updates": ["message"] })
        );
    }

    #[test]
    fn test_response_parsing() {
        let response: PollResponse = serde_json::from_value(json!({
            "ok": true,
            "result": [{ "update_id": 5, "message": {} }]
        }))
        .unwrap();
        assert!(response.ok);
        assert_eq!(response.result.unwrap()[0].update_id, 5);

        let response: PollResponse = serde_json::from_value(json!({ "ok": false })).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());

        let response: PollResponse =
            serde_json::from_value(json!({ "ok": true, "result": null })).unwrap();
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockUpdateSource::new()
            .push_response(PollResponse::updates(vec![Update::new(1)]))
            .push_error(PollerError::InvalidResponse("bad".to_string()));

        let first = mock.get_updates(&request(0)).await.unwrap();
        assert_eq!(first.result.unwrap().len(), 1);

        let second = mock.get_updates(&request(2)).await;
        assert!(matches!(second, Err(PollerError::InvalidResponse(_))));

        let offsets: Vec<i64> = mock.requests().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_mock_stops_state_when_exhausted() {
        let state = LoopState::new();
        let mock = MockUpdateSource::new().stopping(state.clone());

        let response = mock.get_updates(&request(0)).await.unwrap();
        assert_eq!(response, PollResponse::no_result());
        assert!(!state.is_running());
    }

    #[tokio::test]
    async fn test_mock_without_state_never_answers() {
        let mock = MockUpdateSource::new();
        let result = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            mock.get_updates(&request(0)),
        )
        .await;
        assert!(result.is_err());
    }
}
