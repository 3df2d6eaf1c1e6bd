//! Domain types for telepoll
//!
//! - Update: an opaque event from the remote queue, keyed by `update_id`
//! - UpdateSelection: the allowed update types (or the `*` wildcard)

pub mod selection;
pub mod update;

pub use selection::{KNOWN_UPDATE_TYPES, UpdateSelection, WILDCARD};
pub use update::{UPDATE_ID_FIELD, Update};
