//! Mapping from entity id to the entity's remote lifecycle.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{SyncError, TransitionError};
use crate::model::Entity;
use crate::remote::RemoteValue;
use crate::store::Revision;

/// Remote lifecycle of one stored entity.
pub type RemoteEntity<E> = RemoteValue<E, SyncError>;

/// Thread-safe entity store.
///
/// Entries are created on the first fetch attempt and only ever replaced by
/// a valid lifecycle transition. Nothing is evicted except by `reset`.
pub struct EntityStore<E: Entity> {
    inner: Arc<RwLock<EntityStoreInner<E>>>,
}

struct EntityStoreInner<E: Entity> {
    entries: HashMap<E::Id, RemoteEntity<E>>,
    revision: Revision,
}

impl<E: Entity> Clone for EntityStore<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity> Default for EntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityStore<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(EntityStoreInner {
                entries: HashMap::new(),
                revision: 0,
            })),
        }
    }

    /// Moves `id` into a loading stage.
    ///
    /// Returns `false` when a fetch for `id` is already in flight; the entry
    /// is left untouched in that case.
    pub fn begin_fetch(&self, id: &E::Id) -> bool {
        let mut inner = self.inner.write();
        let current = inner.entries.remove(id).unwrap_or_default();
        if current.is_loading() {
            inner.entries.insert(id.clone(), current);
            return false;
        }
        let from = current.stage();
        let next = current.begin_fetch();
        tracing::debug!(id = %id, from, to = next.stage(), "Entity fetch started");
        inner.entries.insert(id.clone(), next);
        inner.revision += 1;
        true
    }

    /// Settles the in-flight fetch of `id` with `value`.
    pub fn succeed(&self, id: &E::Id, value: E) -> Result<(), TransitionError> {
        self.settle(id, "succeed", |current| current.succeed(value))
    }

    /// Settles the in-flight fetch of `id` with `err`, keeping any previous value.
    pub fn fail(&self, id: &E::Id, err: SyncError) -> Result<(), TransitionError> {
        self.settle(id, "fail", |current| current.fail(err))
    }

    fn settle<F>(&self, id: &E::Id, operation: &'static str, apply: F) -> Result<(), TransitionError>
    where
        F: FnOnce(RemoteEntity<E>) -> Result<RemoteEntity<E>, RemoteEntity<E>>,
    {
        let mut inner = self.inner.write();
        let current = inner.entries.remove(id).unwrap_or_default();
        match apply(current) {
            Ok(next) => {
                tracing::debug!(id = %id, operation, to = next.stage(), "Entity fetch settled");
                inner.entries.insert(id.clone(), next);
                inner.revision += 1;
                Ok(())
            }
            Err(unchanged) => {
                let from = unchanged.stage();
                if !unchanged.is_none() {
                    inner.entries.insert(id.clone(), unchanged);
                }
                Err(TransitionError {
                    id: id.to_string(),
                    operation,
                    from,
                })
            }
        }
    }

    /// Current lifecycle of `id`; `None` if never fetched.
    pub fn get(&self, id: &E::Id) -> RemoteEntity<E> {
        self.inner.read().entries.get(id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.inner.read().entries.contains_key(id)
    }

    /// Loaded value of `id`, if any `Some*` variant is stored.
    pub fn value(&self, id: &E::Id) -> Option<E> {
        self.inner.read().entries.get(id).and_then(|entry| entry.value().cloned())
    }

    /// All ids that have ever been fetched.
    pub fn ids(&self) -> Vec<E::Id> {
        self.inner.read().entries.keys().cloned().collect()
    }

    /// Values of every entry currently holding one.
    pub fn values(&self) -> HashMap<E::Id, E> {
        self.inner
            .read()
            .entries
            .iter()
            .filter_map(|(id, entry)| entry.value().map(|value| (id.clone(), value.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn revision(&self) -> Revision {
        self.inner.read().revision
    }

    /// Drops every entry. Reserved for full invalidation by the owner.
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.revision += 1;
        tracing::info!("Entity store reset");
    }
}
