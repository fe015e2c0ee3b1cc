use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DecodeFailure, SyncError};
use crate::model::Entity;

/// Status code the orchestrator treats as success.
pub const STATUS_OK: u16 = 200;

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody<T> {
    Value(T),
    Problem(Problem),
}

/// A decoded backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse<T> {
    pub status: u16,
    pub body: ResponseBody<T>,
}

impl<T> FetchResponse<T> {
    pub fn ok(value: T) -> Self {
        Self {
            status: STATUS_OK,
            body: ResponseBody::Value(value),
        }
    }

    pub fn problem(status: u16, title: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Problem(Problem {
                title: Some(title.into()),
                detail: None,
            }),
        }
    }

    /// Classifies the response: 200 with a value succeeds, anything else is
    /// a typed error.
    pub fn into_result(self) -> Result<T, SyncError> {
        match (self.status, self.body) {
            (STATUS_OK, ResponseBody::Value(value)) => Ok(value),
            (STATUS_OK, ResponseBody::Problem(_)) => Err(SyncError::Decode(
                DecodeFailure::single("", "expected an entity in a success response"),
            )),
            (status, ResponseBody::Problem(problem)) => Err(SyncError::Remote {
                status,
                message: problem
                    .title
                    .or(problem.detail)
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            }),
            (status, ResponseBody::Value(_)) => Err(SyncError::Remote {
                status,
                message: format!("HTTP {}", status),
            }),
        }
    }
}

/// Failure of the fetch capability before a response could be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("{0}")]
    Decode(#[from] DecodeFailure),
    #[error("{0}")]
    Transport(String),
}

impl From<FetchFailure> for SyncError {
    fn from(failure: FetchFailure) -> Self {
        match failure {
            FetchFailure::Decode(failure) => SyncError::Decode(failure),
            FetchFailure::Transport(message) => SyncError::Transport(message),
        }
    }
}

/// Capability that loads one entity by id from the backend.
///
/// Timeouts belong to the implementation.
pub trait Fetch<E: Entity>: Send + Sync + 'static {
    fn fetch(
        &self,
        id: &E::Id,
    ) -> impl Future<Output = Result<FetchResponse<E>, FetchFailure>> + Send;
}
