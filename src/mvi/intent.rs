//! Base trait for store intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (mark read, archive)
/// - Orchestrator steps (first successful load)
/// - Session events (identity changed)
pub trait Intent: Send + 'static {}
