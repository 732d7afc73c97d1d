//! Public job submission API.

mod handle;
mod runner;

pub use handle::{JobHandle, JobState};
pub use runner::{JobRunner, JobRunnerBuilder};
