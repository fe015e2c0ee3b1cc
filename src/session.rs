//! Per-session ownership of the stores and the reaction to identity changes.

use std::collections::BTreeSet;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::{Message, MessageId, Service, ServiceId};
use crate::store::entity::RemoteEntity;
use crate::store::{EntityStore, StatusStore};
use crate::sync::{Fetch, RelatedFetchQueue, SyncOrchestrator};
use crate::views::MessageViews;

/// Emitted when a different profile signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityChanged;

/// Clears local message status when the signed-in identity changes.
///
/// The entity stores are left alone; the owner decides whether to reset them.
#[derive(Clone)]
pub struct InvalidationHook {
    status: StatusStore,
}

impl InvalidationHook {
    pub fn new(status: StatusStore) -> Self {
        Self { status }
    }

    pub fn handle(&self, _signal: IdentityChanged) {
        tracing::info!("Identity changed, clearing message status");
        self.status.clear();
    }

    /// Listens for identity changes until every sender is gone.
    pub fn spawn(self, mut signals: broadcast::Receiver<IdentityChanged>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match signals.recv().await {
                    Ok(signal) => self.handle(signal),
                    Err(RecvError::Lagged(skipped)) => {
                        // Missed signals still mean the identity changed.
                        tracing::warn!(skipped, "Identity signals lagged");
                        self.handle(IdentityChanged);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Stores, orchestrator and views for one signed-in session.
///
/// Must be started inside a tokio runtime: the related-service worker is
/// spawned on construction.
pub struct InboxSession<F> {
    messages: SyncOrchestrator<Message, F>,
    services: EntityStore<Service>,
    status: StatusStore,
    related: RelatedFetchQueue<ServiceId>,
    worker: JoinHandle<()>,
    views: MessageViews,
    hook: InvalidationHook,
}

impl<F> InboxSession<F>
where
    F: Fetch<Message>,
{
    pub fn start<G>(message_fetch: F, service_fetch: G, config: &SyncConfig) -> Self
    where
        G: Fetch<Service>,
    {
        let message_store = EntityStore::new();
        let services = EntityStore::new();
        let status = StatusStore::new();

        let (related, worker) = RelatedFetchQueue::new(config.related_queue_capacity);
        let worker = tokio::spawn(worker.run(SyncOrchestrator::new(services.clone(), service_fetch)));

        Self {
            messages: SyncOrchestrator::new(message_store.clone(), message_fetch),
            views: MessageViews::new(message_store, status.clone()),
            hook: InvalidationHook::new(status.clone()),
            services,
            status,
            related,
            worker,
        }
    }

    /// Loads a message and requests its sender service if needed.
    pub async fn load_message(&self, id: &MessageId) -> Result<Message, SyncError> {
        self.messages
            .fetch_with_relations(
                id,
                &self.status,
                &self.services,
                |message| message.sender_service_id.clone(),
                &self.related,
            )
            .await
    }

    /// Marks a loaded, unread message as read. Returns whether it changed.
    pub fn open_message(&self, id: &MessageId) -> bool {
        if self.messages.store().value(id).is_none() || self.views.is_read(id) {
            return false;
        }
        self.status.set_read(id.clone(), true);
        true
    }

    pub fn set_read(&self, id: MessageId, is_read: bool) {
        self.status.set_read(id, is_read);
    }

    pub fn set_archived(&self, ids: BTreeSet<MessageId>, is_archived: bool) {
        self.status.set_archived(ids, is_archived);
    }

    pub fn remove_messages(&self, ids: BTreeSet<MessageId>) {
        self.status.remove(ids);
    }

    pub fn message(&self, id: &MessageId) -> RemoteEntity<Message> {
        self.messages.store().get(id)
    }

    pub fn service(&self, id: &ServiceId) -> RemoteEntity<Service> {
        self.services.get(id)
    }

    pub fn views(&self) -> &MessageViews {
        &self.views
    }

    pub fn status(&self) -> &StatusStore {
        &self.status
    }

    pub fn messages(&self) -> &EntityStore<Message> {
        self.messages.store()
    }

    pub fn services(&self) -> &EntityStore<Service> {
        &self.services
    }

    pub fn invalidation_hook(&self) -> InvalidationHook {
        self.hook.clone()
    }

    pub fn identity_changed(&self) {
        self.hook.handle(IdentityChanged);
    }

    /// Closes the related-fetch queue and waits for queued fetches to finish.
    pub async fn shutdown(self) {
        let Self { related, worker, .. } = self;
        drop(related);
        if let Err(err) = worker.await {
            tracing::warn!(error = %err, "Related fetch worker did not stop cleanly");
        }
    }
}
