//! Error taxonomy for fetch orchestration.

use std::fmt;

use thiserror::Error;

/// One field that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path to the offending field, empty for the root.
    pub path: String,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "root"
        } else {
            self.path.as_str()
        };
        write!(f, "{} at [{}]", self.reason, path)
    }
}

/// A payload that did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodeFailure {
    pub issues: Vec<ValidationIssue>,
}

impl DecodeFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn single(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue::new(path, reason)])
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "payload did not match the expected shape");
        }
        let joined: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        write!(f, "{}", joined.join(", "))
    }
}

impl std::error::Error for DecodeFailure {}

impl From<serde_json::Error> for DecodeFailure {
    fn from(err: serde_json::Error) -> Self {
        DecodeFailure::single("", format!("{} (line {}, column {})", err, err.line(), err.column()))
    }
}

/// A store operation that does not match the lifecycle table.
///
/// Only reachable through a programming error in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition '{operation}' for '{id}' from stage '{from}'")]
pub struct TransitionError {
    pub id: String,
    pub operation: &'static str,
    pub from: &'static str,
}

/// Errors produced by a fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The response body did not decode.
    #[error("Decode error: {0}")]
    Decode(DecodeFailure),

    /// The backend answered with a non-success status.
    #[error("Remote error: {status} - {message}")]
    Remote { status: u16, message: String },

    /// Contract violation inside the store.
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Another fetch for the same id is still outstanding.
    #[error("Fetch already in flight for '{id}'")]
    InFlight { id: String },

    /// The transport failed before a response was available.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<DecodeFailure> for SyncError {
    fn from(failure: DecodeFailure) -> Self {
        SyncError::Decode(failure)
    }
}

impl SyncError {
    /// Stable identifier for logs and UI mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Decode(_) => "decode_error",
            SyncError::Remote { .. } => "remote_error",
            SyncError::InvalidTransition(_) => "invalid_transition",
            SyncError::InFlight { .. } => "in_flight",
            SyncError::Transport(_) => "transport_error",
        }
    }
}
