//! Allowed update types
//!
//! The caller picks either every update type (the `*` wildcard) or an
//! explicit set of type names.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{PollerError, Result};

/// Wildcard entry meaning "all update types"
pub const WILDCARD: &str = "*";

/// Update type names the remote protocol currently documents
pub const KNOWN_UPDATE_TYPES: &[&str] = &[
    "message",
    "edited_message",
    "channel_post",
    "edited_channel_post",
    "business_connection",
    "business_message",
    "edited_business_message",
    "deleted_business_messages",
    "message_reaction",
    "message_reaction_count",
    "inline_query",
    "chosen_inline_result",
    "callback_query",
    "shipping_query",
    "pre_checkout_query",
    "purchased_paid_media",
    "poll",
    "poll_answer",
    "my_chat_member",
    "chat_member",
    "chat_join_request",
    "chat_boost",
    "removed_chat_boost",
];

/// Which update types are forwarded downstream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UpdateSelection {
    /// No filtering
    #[default]
    All,
    /// Only updates exposing one of these keys
    Only(BTreeSet<String>),
}

impl UpdateSelection {
    /// Build a selection from the configured list.
    ///
    /// Any `*` entry turns the whole selection into the wildcard. An empty
    /// list or a blank name is a configuration error.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        let mut wildcard = false;

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(PollerError::Config("update type names must not be blank".to_string()));
            }
            if name == WILDCARD {
                wildcard = true;
                continue;
            }
            if !KNOWN_UPDATE_TYPES.contains(&name) {
                log::warn!("Unknown update type '{}', forwarding it as-is", name);
            }
            set.insert(name.to_string());
        }

        if wildcard {
            return Ok(UpdateSelection::All);
        }
        if set.is_empty() {
            return Err(PollerError::Config(
                "updates must list at least one type or '*'".to_string(),
            ));
        }
        Ok(UpdateSelection::Only(set))
    }

    /// Selection of explicit type names; an empty set means all
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            UpdateSelection::All
        } else {
            UpdateSelection::Only(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, UpdateSelection::All)
    }

    /// The `allowed_updates` hint sent to the remote source.
    ///
    /// Empty for the wildcard, which the remote reads as "default set".
    pub fn allowed_updates(&self) -> Vec<String> {
        match self {
            UpdateSelection::All => Vec::new(),
            UpdateSelection::Only(set) => set.iter().cloned().collect(),
        }
    }

    /// Allowed type names; empty for the wildcard
    pub fn names(&self) -> Option<&BTreeSet<String>> {
        match self {
            UpdateSelection::All => None,
            UpdateSelection::Only(set) => Some(set),
        }
    }
}

impl fmt::Display for UpdateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateSelection::All => write!(f, "{}", WILDCARD),
            UpdateSelection::Only(set) => {
                let names: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}
