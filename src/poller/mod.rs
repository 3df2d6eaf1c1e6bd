//! Polling core
//!
//! - PollCursor: next offset to request
//! - LoopState: running flag shared with the controller
//! - PollConfig: immutable parameters captured at start
//! - PollLoop: the request/advance/filter/emit cycle

pub mod cursor;
pub mod poll_config;
pub mod poll_loop;
pub mod state;

pub use cursor::PollCursor;
pub use poll_config::{DEFAULT_LIMIT, DEFAULT_TIMEOUT_SECS, MAX_LIMIT, MIN_LIMIT, PollConfig};
pub use poll_loop::{PollLoop, PollReport};
pub use state::LoopState;
