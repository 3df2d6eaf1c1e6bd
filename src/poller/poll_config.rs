//! Immutable polling parameters captured when a loop starts

use crate::domain::UpdateSelection;
use crate::error::{PollerError, Result};
use crate::transport::GetUpdatesRequest;

/// Smallest batch size the remote accepts
pub const MIN_LIMIT: u32 = 1;
/// Largest batch size the remote accepts
pub const MAX_LIMIT: u32 = 100;
/// Default batch size
pub const DEFAULT_LIMIT: u32 = 100;
/// Default long-poll timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u32 = 60;

#[derive(Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Initial cursor value; negative reads from the end of the queue
    pub offset: i64,
    /// Max updates per call (1..=100)
    pub limit: u32,
    /// Long-poll timeout in seconds; 0 is short polling
    pub timeout: u32,
    /// Update types forwarded downstream
    pub selection: UpdateSelection,
    /// Remote origin, e.g. https://api.telegram.org
    pub base_url: String,
    /// Bot credential embedded in the request path
    pub access_token: String,
}

impl PollConfig {
    /// Config with default offset, limit, timeout and the wildcard selection
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT_SECS,
            selection: UpdateSelection::All,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_selection(mut self, selection: UpdateSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Reject values the remote would refuse
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(PollerError::Config(format!(
                "limit must be between {} and {}, got {}",
                MIN_LIMIT, MAX_LIMIT, self.limit
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(PollerError::Config("base_url must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(PollerError::Config("access_token must not be empty".to_string()));
        }
        Ok(())
    }

    /// getUpdates body for the given cursor position
    pub fn request(&self, offset: i64) -> GetUpdatesRequest {
        GetUpdatesRequest {
            offset,
            limit: self.limit,
            timeout: self.timeout,
            allowed_updates: self.selection.allowed_updates(),
        }
    }
}

impl std::fmt::Debug for PollConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollConfig")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("timeout", &self.timeout)
            .field("selection", &self.selection)
            .field("base_url", &self.base_url)
            .finish()
    }
}
