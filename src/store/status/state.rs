use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::MessageId;
use crate::mvi::StoreState;

/// Locally owned flags of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStatus {
    pub is_read: bool,
    pub is_archived: bool,
}

impl MessageStatus {
    /// Record written on first load and synthesized for absent ids.
    ///
    /// The views treat an absent record as unread and unarchived; both rules
    /// rely on this being all `false`.
    pub const DEFAULT: MessageStatus = MessageStatus {
        is_read: false,
        is_archived: false,
    };
}

/// Snapshot of the status store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusState {
    entries: BTreeMap<MessageId, MessageStatus>,
}

impl StoreState for StatusState {}

impl StatusState {
    pub fn get(&self, id: &MessageId) -> Option<&MessageStatus> {
        self.entries.get(id)
    }

    /// Stored record, or the default when absent.
    pub fn get_or_default(&self, id: &MessageId) -> MessageStatus {
        self.entries.get(id).copied().unwrap_or(MessageStatus::DEFAULT)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&MessageId, &MessageStatus)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn entries_mut(&mut self) -> &mut BTreeMap<MessageId, MessageStatus> {
        &mut self.entries
    }
}

impl FromIterator<(MessageId, MessageStatus)> for StatusState {
    fn from_iter<I: IntoIterator<Item = (MessageId, MessageStatus)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
