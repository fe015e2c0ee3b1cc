//! Fetch orchestration: drives entity stores through their lifecycle and
//! fans out fire-and-forget requests for related entities.

mod fetch;
mod orchestrator;
mod related;

pub use fetch::{Fetch, FetchFailure, FetchResponse, Problem, ResponseBody, STATUS_OK};
pub use orchestrator::SyncOrchestrator;
pub use related::{RelatedFetchQueue, RelatedFetchTrigger, RelatedFetchWorker};
