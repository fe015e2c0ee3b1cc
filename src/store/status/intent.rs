use std::collections::BTreeSet;

use crate::model::MessageId;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum StatusIntent {
    /// Insert the default record unless one exists. Sent on first successful load.
    EnsureDefault { id: MessageId },
    SetRead { id: MessageId, is_read: bool },
    /// Applied to every id in one step.
    SetArchived {
        ids: BTreeSet<MessageId>,
        is_archived: bool,
    },
    /// Drop exactly these ids; unknown ids are ignored.
    Remove { ids: BTreeSet<MessageId> },
    /// Signed-in identity changed.
    Clear,
}

impl Intent for StatusIntent {}
