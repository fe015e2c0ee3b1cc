//! Unidirectional state primitives shared by the local stores.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Views
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot of a store
//! - **Intent**: a requested mutation (UI event, orchestrator step, sign-in change)
//! - **Reducer**: pure function producing the next snapshot

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
