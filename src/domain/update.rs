//! Update records received from the remote event source
//!
//! An update is forwarded opaquely: only `update_id` is interpreted, the
//! remaining top-level keys say what kind of update it is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field every update carries
pub const UPDATE_ID_FIELD: &str = "update_id";

/// A single event from the remote queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing identifier within one source
    pub update_id: i64,
    /// Every other top-level field, untouched
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Update {
    /// Create an update with an empty payload
    pub fn new(update_id: i64) -> Self {
        Self {
            update_id,
            payload: Map::new(),
        }
    }

    /// Add a top-level field (builder style)
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Whether the update exposes a top-level key with this name
    pub fn has_key(&self, key: &str) -> bool {
        key == UPDATE_ID_FIELD || self.payload.contains_key(key)
    }

    /// Top-level keys other than `update_id`
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.payload.keys().map(String::as_str)
    }
}
