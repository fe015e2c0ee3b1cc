use std::sync::Arc;

use crate::error::SyncError;
use crate::model::{Entity, Message, MessageId};
use crate::store::{EntityStore, StatusStore};
use crate::sync::fetch::Fetch;
use crate::sync::related::RelatedFetchTrigger;

/// Drives one entity kind's store with a fetch capability.
///
/// Only one fetch per id runs at a time: a request for an id that is already
/// loading returns `SyncError::InFlight` without touching the store.
pub struct SyncOrchestrator<E: Entity, F> {
    store: EntityStore<E>,
    fetcher: Arc<F>,
}

impl<E: Entity, F> Clone for SyncOrchestrator<E, F> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<E, F> SyncOrchestrator<E, F>
where
    E: Entity,
    F: Fetch<E>,
{
    pub fn new(store: EntityStore<E>, fetcher: F) -> Self {
        Self {
            store,
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn store(&self) -> &EntityStore<E> {
        &self.store
    }

    /// Fetches `id` and records the outcome in the store.
    ///
    /// The loading transition is applied before the first await. The fetch
    /// runs on its own task, so dropping the returned future does not stop
    /// the success or failure from being recorded.
    pub async fn fetch_entity(&self, id: &E::Id) -> Result<E, SyncError> {
        if !self.store.begin_fetch(id) {
            tracing::trace!(id = %id, "Fetch already in flight, skipping");
            return Err(SyncError::InFlight { id: id.to_string() });
        }

        let store = self.store.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let task_id = id.clone();
        let task = tokio::spawn(async move {
            let outcome = match fetcher.fetch(&task_id).await {
                Ok(response) => response.into_result(),
                Err(failure) => Err(SyncError::from(failure)),
            };
            settle(&store, &task_id, outcome)
        });

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let err = SyncError::Transport(format!("fetch task failed: {}", join_err));
                tracing::error!(id = %id, error = %err, "Fetch task aborted");
                if let Err(transition) = self.store.fail(id, err.clone()) {
                    return Err(transition.into());
                }
                Err(err)
            }
        }
    }
}

fn settle<E: Entity>(
    store: &EntityStore<E>,
    id: &E::Id,
    outcome: Result<E, SyncError>,
) -> Result<E, SyncError> {
    match outcome {
        Ok(value) => {
            store.succeed(id, value.clone())?;
            tracing::info!(id = %id, "Entity loaded");
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(id = %id, kind = err.kind(), error = %err, "Entity fetch failed");
            store.fail(id, err.clone())?;
            Err(err)
        }
    }
}

impl<F> SyncOrchestrator<Message, F>
where
    F: Fetch<Message>,
{
    /// Fetches a message, then records the default status for `id` and
    /// requests its related entity.
    ///
    /// The status is keyed by the requested id, the same key the entity
    /// store uses, even if the payload carries a different id.
    ///
    /// The related request is only issued when the related entity has no
    /// value and is not already loading. It goes through `trigger` and is
    /// never awaited, so its outcome cannot fail this call. On failure the
    /// error is returned and neither the status store nor the trigger is
    /// touched.
    pub async fn fetch_with_relations<R, S, T>(
        &self,
        id: &MessageId,
        status: &StatusStore,
        related: &EntityStore<R>,
        select_related: S,
        trigger: &T,
    ) -> Result<Message, SyncError>
    where
        R: Entity,
        S: FnOnce(&Message) -> R::Id,
        T: RelatedFetchTrigger<R::Id> + ?Sized,
    {
        let message = self.fetch_entity(id).await?;
        status.ensure_default(id.clone());

        let related_id = select_related(&message);
        let current = related.get(&related_id);
        if !current.is_some() && !current.is_loading() {
            tracing::debug!(id = %id, related = %related_id, "Requesting related entity");
            trigger.trigger(related_id);
        }
        Ok(message)
    }
}
