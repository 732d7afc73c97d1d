//! Handle to a submitted job.

use tokio::sync::watch;

use crate::application::JobOutcome;
use crate::core::CancelSignal;

/// Lifecycle of a submitted job attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    /// Waiting for a free worker slot.
    Queued,
    Running,
    Succeeded(JobOutcome),
    Failed(String),
}

impl JobState {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobState::Succeeded(_) | JobState::Failed(_))
    }
}

/// Handle to a queued or running job.
///
/// Allows polling [`state()`](Self::state), blocking on completion via
/// [`wait()`](Self::wait), and cooperative cancellation.
pub struct JobHandle {
    state_rx: watch::Receiver<JobState>,
    cancel: CancelSignal,
}

impl JobHandle {
    pub(crate) fn new(state_rx: watch::Receiver<JobState>, cancel: CancelSignal) -> Self {
        Self { state_rx, cancel }
    }

    /// Return the current state (non-blocking).
    pub fn state(&self) -> JobState {
        self.state_rx.borrow().clone()
    }

    /// Block until the job finishes and return its final state.
    pub async fn wait_state(&self) -> JobState {
        let mut rx = self.state_rx.clone();
        loop {
            let state = rx.borrow_and_update().clone();
            if state.is_finished() {
                return state;
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }

    /// Block until the job finishes; `true` when the attempt succeeded.
    pub async fn wait(&self) -> bool {
        matches!(self.wait_state().await, JobState::Succeeded(_))
    }

    /// Request cancellation. Takes effect between status polls.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
