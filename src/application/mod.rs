//! Application layer: the operations a job attempt is composed of.
//!
//! Submodules:
//! - [`resolve`]: get-or-create resolvers and the study cache check.
//! - [`clone`]: copying a cached study to a new owner.
//! - [`reconcile`]: result-table reconciliation.
//! - [`job_run`]: dispatch, polling and the orchestrator tying it together.

pub mod clone;
pub mod job_run;
pub mod reconcile;
pub mod resolve;

pub use clone::clone_study;
pub use job_run::{JobOrchestrator, JobOutcome, JobRequest, JobServices, PollOutcome};
pub use reconcile::ResultReconciler;
pub use resolve::Resolved;
