//! Transport layer - one long-poll request per call
//!
//! - UpdateSource trait for the remote queue
//! - TelegramClient implementation over reqwest
//! - MockUpdateSource for tests

pub mod source;
pub mod telegram;

pub use source::{GetUpdatesRequest, MockStep, MockUpdateSource, PollResponse, UpdateSource};
pub use telegram::{DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, TelegramClient};
