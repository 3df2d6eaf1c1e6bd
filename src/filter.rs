//! Update filter - keeps the updates whose type is in the allowed set.

use crate::domain::{Update, UpdateSelection};

/// Keep an update iff one of its top-level keys is an allowed type name.
pub fn is_allowed(update: &Update, selection: &UpdateSelection) -> bool {
    match selection.names() {
        None => true,
        Some(names) => names.iter().any(|name| update.has_key(name)),
    }
}

/// Filter a batch, preserving order. The wildcard returns the batch untouched.
pub fn filter_updates(updates: Vec<Update>, selection: &UpdateSelection) -> Vec<Update> {
    if selection.is_all() {
        return updates;
    }
    updates
        .into_iter()
        .filter(|update| is_allowed(update, selection))
        .collect()
}
