//! telepoll - long-polling Telegram update trigger
//!
//! Repeatedly asks the Bot API for pending updates, advances the offset
//! cursor as batches are consumed, filters them by update type and hands
//! each batch to a downstream sink. The loop runs as a background task
//! that can be stopped at any time.

pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod poller;
pub mod sink;
pub mod transport;
pub mod trigger;

pub use error::{PollerError, Result};
pub use trigger::{Trigger, TriggerHandle};
