//! Derived, memoized projections over the message and status stores.
//!
//! The filtered views range over the ids present in the status store, so an
//! empty status store yields empty views whatever the entity store holds.
//! Point lookups (`status_of`, `is_read`) fall back to the default record for
//! ids with no status yet.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::{Message, MessageId};
use crate::store::{EntityStore, MessageStatus, Revision, StatusState, StatusStore};

/// Shared list of ids produced by a view.
pub type IdList = Arc<[MessageId]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Filter {
    Unread,
    Read,
    Archived,
    Unarchived,
}

impl Filter {
    fn select(self, status: Option<&MessageStatus>) -> bool {
        // Absent records count as the default: unread and unarchived.
        let status = status.copied().unwrap_or(MessageStatus::DEFAULT);
        match self {
            Filter::Unread => !status.is_read,
            Filter::Read => status.is_read,
            Filter::Archived => status.is_archived,
            Filter::Unarchived => !status.is_archived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ViewKey {
    Filter(Filter),
    UnreadAndUnarchived,
}

/// Read-only projections of the message stores.
///
/// Cloning shares the memo cache.
#[derive(Clone)]
pub struct MessageViews {
    messages: EntityStore<Message>,
    status: StatusStore,
    cache: Arc<Mutex<HashMap<ViewKey, (Revision, IdList)>>>,
}

impl MessageViews {
    pub fn new(messages: EntityStore<Message>, status: StatusStore) -> Self {
        Self {
            messages,
            status,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn unread_ids(&self) -> IdList {
        self.filtered(Filter::Unread)
    }

    pub fn read_ids(&self) -> IdList {
        self.filtered(Filter::Read)
    }

    pub fn archived_ids(&self) -> IdList {
        self.filtered(Filter::Archived)
    }

    pub fn unarchived_ids(&self) -> IdList {
        self.filtered(Filter::Unarchived)
    }

    /// Intersection of `unread_ids` and `unarchived_ids`, in id order.
    pub fn unread_and_unarchived_ids(&self) -> IdList {
        self.status.read(|state, revision| {
            let key = ViewKey::UnreadAndUnarchived;
            if let Some(ids) = self.cached(key, revision) {
                return ids;
            }
            let unread = self.filtered_in(state, revision, Filter::Unread);
            let unarchived = self.filtered_in(state, revision, Filter::Unarchived);
            let unarchived: BTreeSet<&MessageId> = unarchived.iter().collect();
            let ids: IdList = unread
                .iter()
                .filter(|id| unarchived.contains(id))
                .cloned()
                .collect();
            self.store_cached(key, revision, ids.clone());
            ids
        })
    }

    /// Stored record of `id`, or the default when there is none.
    pub fn status_of(&self, id: &MessageId) -> MessageStatus {
        self.status.get(id).unwrap_or(MessageStatus::DEFAULT)
    }

    pub fn is_read(&self, id: &MessageId) -> bool {
        self.status_of(id).is_read
    }

    /// Orders `ids` with `compare` over the loaded messages.
    ///
    /// The order is computed once, on call, against the messages loaded at
    /// that moment; the returned sequence does not follow later loads.
    ///
    /// Ids without a loaded message keep their relative order after the
    /// loaded ones. The sort is stable, so equal keys keep input order.
    pub fn ordered_ids<C>(&self, ids: &[MessageId], compare: C) -> OrderedIds
    where
        C: Fn(&Message, &Message) -> Ordering,
    {
        let loaded = self.messages.values();
        let mut sorted: Vec<MessageId> = ids.to_vec();
        sorted.sort_by(|a, b| match (loaded.get(a), loaded.get(b)) {
            (Some(a), Some(b)) => compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        OrderedIds {
            ids: sorted.into(),
        }
    }

    fn filtered(&self, filter: Filter) -> IdList {
        self.status
            .read(|state, revision| self.filtered_in(state, revision, filter))
    }

    fn filtered_in(&self, state: &StatusState, revision: Revision, filter: Filter) -> IdList {
        let key = ViewKey::Filter(filter);
        if let Some(ids) = self.cached(key, revision) {
            return ids;
        }
        let ids: IdList = state
            .iter()
            .filter(|(_, status)| filter.select(Some(status)))
            .map(|(id, _)| id.clone())
            .collect();
        self.store_cached(key, revision, ids.clone());
        ids
    }

    fn cached(&self, key: ViewKey, revision: Revision) -> Option<IdList> {
        let cache = self.cache.lock();
        match cache.get(&key) {
            Some((cached_revision, ids)) if *cached_revision == revision => Some(ids.clone()),
            _ => None,
        }
    }

    fn store_cached(&self, key: ViewKey, revision: Revision, ids: IdList) {
        self.cache.lock().insert(key, (revision, ids));
    }
}

/// Newest message first.
pub fn newest_first(a: &Message, b: &Message) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Finite, restartable sequence of ordered ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedIds {
    ids: IdList,
}

impl OrderedIds {
    /// A fresh iterator from the first id.
    pub fn iter(&self) -> std::slice::Iter<'_, MessageId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> IntoIterator for &'a OrderedIds {
    type Item = &'a MessageId;
    type IntoIter = std::slice::Iter<'a, MessageId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
