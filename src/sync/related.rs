use std::fmt;
use std::hash::Hash;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinSet;

use crate::model::Entity;
use crate::sync::fetch::Fetch;
use crate::sync::orchestrator::SyncOrchestrator;

/// Fire-and-forget request for a related entity.
pub trait RelatedFetchTrigger<Id>: Send + Sync {
    fn trigger(&self, id: Id);
}

impl<Id, F> RelatedFetchTrigger<Id> for F
where
    F: Fn(Id) + Send + Sync,
{
    fn trigger(&self, id: Id) {
        self(id)
    }
}

/// Producer side of the related-fetch queue.
#[derive(Clone)]
pub struct RelatedFetchQueue<Id> {
    sender: mpsc::Sender<Id>,
}

impl<Id: Send + 'static> RelatedFetchQueue<Id> {
    /// Creates a bounded queue and the worker that drains it.
    pub fn new(capacity: usize) -> (Self, RelatedFetchWorker<Id>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, RelatedFetchWorker { receiver })
    }
}

impl<Id> RelatedFetchTrigger<Id> for RelatedFetchQueue<Id>
where
    Id: fmt::Display + Send + 'static,
{
    fn trigger(&self, id: Id) {
        match self.sender.try_send(id) {
            Ok(()) => {}
            Err(TrySendError::Full(id)) => {
                tracing::warn!(id = %id, "Related fetch queue full, dropping request");
            }
            Err(TrySendError::Closed(id)) => {
                tracing::trace!(id = %id, "Related fetch queue closed (worker gone)");
            }
        }
    }
}

/// Consumer side of the related-fetch queue.
pub struct RelatedFetchWorker<Id> {
    receiver: mpsc::Receiver<Id>,
}

impl<Id> RelatedFetchWorker<Id>
where
    Id: Clone + Eq + Hash + Ord + fmt::Display + Send + Sync + 'static,
{
    /// Fetches every queued id until all queue handles are dropped, then
    /// waits for the outstanding fetches.
    ///
    /// Failures are recorded in the related store and logged; nothing is
    /// reported back to the requester.
    pub async fn run<E, F>(mut self, orchestrator: SyncOrchestrator<E, F>)
    where
        E: Entity<Id = Id>,
        F: Fetch<E>,
    {
        let mut pending = JoinSet::new();
        while let Some(id) = self.receiver.recv().await {
            let orchestrator = orchestrator.clone();
            pending.spawn(async move {
                if let Err(err) = orchestrator.fetch_entity(&id).await {
                    tracing::debug!(id = %id, kind = err.kind(), "Related fetch did not complete");
                }
            });
            while pending.try_join_next().is_some() {}
        }
        while pending.join_next().await.is_some() {}
        tracing::debug!("Related fetch worker stopped");
    }
}
