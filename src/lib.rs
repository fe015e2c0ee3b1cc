//! Client-side message state: remote lifecycle values, entity and status
//! stores, fetch orchestration and memoized derived views.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod mvi;
pub mod remote;
pub mod session;
pub mod store;
pub mod sync;
pub mod transport;
pub mod views;

pub use error::{DecodeFailure, SyncError, TransitionError, ValidationIssue};
pub use remote::RemoteValue;
