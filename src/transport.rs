//! HTTP implementation of the fetch capability.

use std::future::Future;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::error::DecodeFailure;
use crate::model::{Message, MessageId, Service, ServiceId};
use crate::sync::{Fetch, FetchFailure, FetchResponse, Problem, ResponseBody, STATUS_OK};

/// Backend client for messages and services.
///
/// Cloning shares the connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, FetchFailure> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| FetchFailure::Transport(format!("failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FetchFailure::Transport(format!("invalid base_url '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchFailure::Transport(format!(
                "base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `{base}/{collection}/{id}` with `id` percent-encoded as one segment.
    fn entity_url(&self, collection: &str, id: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base can carry path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection).push(id);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<FetchResponse<T>, FetchFailure> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        if status == STATUS_OK {
            let value = serde_json::from_slice::<T>(&bytes).map_err(DecodeFailure::from)?;
            return Ok(FetchResponse {
                status,
                body: ResponseBody::Value(value),
            });
        }

        // Error bodies are best effort; an unreadable one still yields the status.
        let problem = serde_json::from_slice::<Problem>(&bytes).unwrap_or_default();
        Ok(FetchResponse {
            status,
            body: ResponseBody::Problem(problem),
        })
    }
}

impl Fetch<Message> for HttpBackend {
    fn fetch(
        &self,
        id: &MessageId,
    ) -> impl Future<Output = Result<FetchResponse<Message>, FetchFailure>> + Send {
        self.get_json(self.entity_url("messages", id.as_str()))
    }
}

impl Fetch<Service> for HttpBackend {
    fn fetch(
        &self,
        id: &ServiceId,
    ) -> impl Future<Output = Result<FetchResponse<Service>, FetchFailure>> + Send {
        self.get_json(self.entity_url("services", id.as_str()))
    }
}
