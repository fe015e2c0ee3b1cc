//! Process-wide stores: remote entities and local message status.
//!
//! Both stores are cheap `Clone` handles around shared state. Every mutation
//! takes a single write lock and bumps the store revision, so readers never
//! observe half of a batch and memoized views can tell when to recompute.

pub mod entity;
pub mod status;

pub use entity::EntityStore;
pub use status::{MessageStatus, StatusIntent, StatusReducer, StatusState, StatusStore};

/// Monotonic mutation counter of a store.
pub type Revision = u64;
