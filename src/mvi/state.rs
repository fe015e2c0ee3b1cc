//! Base trait for store snapshots.

/// Marker trait for store state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq so views can detect changes)
/// - Empty by default (the post-invalidation state)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
