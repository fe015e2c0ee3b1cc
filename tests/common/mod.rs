//! Shared test utilities and scripted fetch capabilities.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use msgsync::model::{Entity, Message, MessageContent, MessageId, Service, ServiceId};
use msgsync::sync::{Fetch, FetchFailure, FetchResponse};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

pub type Scripted<E> = Result<FetchResponse<E>, FetchFailure>;

pub fn message(id: &str, sender: &str, created_at: u64) -> Message {
    Message {
        id: MessageId::from(id),
        sender_service_id: ServiceId::from(sender),
        created_at,
        content: MessageContent {
            subject: format!("Subject {}", id),
            markdown: "markdown".to_string(),
        },
    }
}

pub fn service(id: &str) -> Service {
    Service {
        service_id: ServiceId::from(id),
        service_name: format!("Service {}", id),
        organization_name: "Org".to_string(),
    }
}

/// Fetch capability answering from per-id queues of scripted responses.
///
/// Unscripted ids answer 404. With a gate, every fetch waits for a permit
/// before answering.
pub struct ScriptedFetch<E: Entity> {
    responses: Arc<Mutex<HashMap<E::Id, VecDeque<Scripted<E>>>>>,
    calls: Arc<Mutex<Vec<E::Id>>>,
    gate: Option<Arc<Semaphore>>,
}

impl<E: Entity> Clone for ScriptedFetch<E> {
    fn clone(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            calls: Arc::clone(&self.calls),
            gate: self.gate.clone(),
        }
    }
}

impl<E: Entity> ScriptedFetch<E> {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Fetches block until `release` is called on the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut fetch = Self::new();
        fetch.gate = Some(Arc::clone(&gate));
        (fetch, gate)
    }

    pub fn push(&self, id: E::Id, response: Scripted<E>) {
        self.responses.lock().entry(id).or_default().push_back(response);
    }

    pub fn push_ok(&self, value: E) {
        let id = value.id().clone();
        self.push(id, Ok(FetchResponse::ok(value)));
    }

    pub fn calls(&self) -> Vec<E::Id> {
        self.calls.lock().clone()
    }
}

impl<E: Entity> Fetch<E> for ScriptedFetch<E> {
    fn fetch(&self, id: &E::Id) -> impl Future<Output = Scripted<E>> + Send {
        let id = id.clone();
        let responses = Arc::clone(&self.responses);
        let calls = Arc::clone(&self.calls);
        let gate = self.gate.clone();
        async move {
            calls.lock().push(id.clone());
            if let Some(gate) = gate {
                gate.acquire().await.expect("gate closed").forget();
            }
            let next = responses.lock().get_mut(&id).and_then(VecDeque::pop_front);
            next.unwrap_or_else(|| Ok(FetchResponse::problem(404, "not scripted")))
        }
    }
}

/// Polls until `check` holds, yielding to spawned tasks in between.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
