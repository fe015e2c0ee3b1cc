//! Locally owned read/archived flags, keyed by message id.
//!
//! Independent of the entity lifecycle: a record appears on the first
//! successful load of a message (or on the first explicit write) and stays
//! until removed by id or cleared on identity change.

mod intent;
mod reducer;
mod state;

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;

pub use intent::StatusIntent;
pub use reducer::StatusReducer;
pub use state::{MessageStatus, StatusState};

use crate::model::MessageId;
use crate::mvi::Reducer;
use crate::store::Revision;

/// Thread-safe status store.
///
/// All writes go through `dispatch`, which runs the reducer under one write
/// lock.
#[derive(Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<StatusStoreInner>>,
}

#[derive(Default)]
struct StatusStoreInner {
    state: StatusState,
    revision: Revision,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing snapshot, e.g. one restored from disk.
    pub fn from_state(state: StatusState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StatusStoreInner { state, revision: 0 })),
        }
    }

    pub fn dispatch(&self, intent: StatusIntent) {
        tracing::trace!(?intent, "Status intent");
        let mut inner = self.inner.write();
        let state = std::mem::take(&mut inner.state);
        inner.state = StatusReducer::reduce(state, intent);
        inner.revision += 1;
    }

    pub fn ensure_default(&self, id: MessageId) {
        self.dispatch(StatusIntent::EnsureDefault { id });
    }

    pub fn set_read(&self, id: MessageId, is_read: bool) {
        self.dispatch(StatusIntent::SetRead { id, is_read });
    }

    pub fn set_archived(&self, ids: BTreeSet<MessageId>, is_archived: bool) {
        self.dispatch(StatusIntent::SetArchived { ids, is_archived });
    }

    pub fn remove(&self, ids: BTreeSet<MessageId>) {
        self.dispatch(StatusIntent::Remove { ids });
    }

    pub fn clear(&self) {
        self.dispatch(StatusIntent::Clear);
        tracing::info!("Status store cleared");
    }

    /// Stored record of `id`, if any.
    pub fn get(&self, id: &MessageId) -> Option<MessageStatus> {
        self.inner.read().state.get(id).copied()
    }

    pub fn snapshot(&self) -> StatusState {
        self.inner.read().state.clone()
    }

    /// Runs `f` against the current snapshot and its revision under one read lock.
    pub fn read<R>(&self, f: impl FnOnce(&StatusState, Revision) -> R) -> R {
        let inner = self.inner.read();
        f(&inner.state, inner.revision)
    }

    pub fn revision(&self) -> Revision {
        self.inner.read().revision
    }

    pub fn len(&self) -> usize {
        self.inner.read().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().state.is_empty()
    }
}
