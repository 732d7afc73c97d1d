//! End-to-end job lifecycle: dispatch, status polling and completion.

mod dispatch;
mod orchestrator;
mod poller;

pub use dispatch::{dispatch_job, DispatchRequest, DispatchedJob};
pub use orchestrator::{JobOrchestrator, JobOutcome, JobRequest, JobServices};
pub use poller::{PollOutcome, StatusPoller};
