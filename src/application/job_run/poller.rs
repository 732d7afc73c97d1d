use std::time::Duration;

use tokio::time::Instant;

use crate::core::{CancelSignal, PollPolicy};
use crate::domain::{Algorithm, InferenceStudy, StudyStatus};
use crate::error::JobError;
use crate::remote::{AlgorithmService, TaskId, TaskStatusReport};
use crate::store::StudyStore;

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Succeeded(TaskStatusReport),
    Failed(TaskStatusReport),
    /// A configured bound ran out before a terminal status was reported.
    TimedOut { attempts: u32, elapsed: Duration },
}

/// Polls a task's status until it reports `SUCCESS` or `FAILURE`.
///
/// Every change of non-terminal status is persisted on the study as soon as
/// it is seen; repeated statuses cause no write. Terminal reports are handed
/// back to the caller unpersisted.
pub struct StatusPoller<'a> {
    store: &'a dyn StudyStore,
    service: &'a dyn AlgorithmService,
    policy: &'a PollPolicy,
    cancel: Option<&'a CancelSignal>,
}

impl<'a> StatusPoller<'a> {
    pub fn new(
        store: &'a dyn StudyStore,
        service: &'a dyn AlgorithmService,
        policy: &'a PollPolicy,
    ) -> Self {
        Self {
            store,
            service,
            policy,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: Option<&'a CancelSignal>) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn poll(
        &self,
        algorithm: &Algorithm,
        task_id: &TaskId,
        study: &mut InferenceStudy,
    ) -> Result<PollOutcome, JobError> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if let Some(outcome) = self.exhausted(attempts, started.elapsed()) {
                tracing::warn!(
                    task_id = %task_id,
                    study = %study.id,
                    attempts,
                    "task did not reach a terminal status within the poll bounds"
                );
                return Ok(outcome);
            }

            self.wait().await?;
            attempts += 1;

            let report = self.service.status(algorithm, task_id).await?;
            match report.status() {
                StudyStatus::Success => return Ok(PollOutcome::Succeeded(report)),
                StudyStatus::Failure => return Ok(PollOutcome::Failed(report)),
                status if status != study.status => {
                    tracing::debug!(
                        study = %study.id,
                        from = %study.status,
                        to = %status,
                        "task status changed"
                    );
                    study.status = status;
                    self.store.save_study(study).await?;
                }
                _ => {}
            }
        }
    }

    fn exhausted(&self, attempts: u32, elapsed: Duration) -> Option<PollOutcome> {
        let out_of_attempts = self.policy.max_attempts.is_some_and(|max| attempts >= max);
        let out_of_time = self.policy.max_duration.is_some_and(|max| elapsed >= max);
        (out_of_attempts || out_of_time).then_some(PollOutcome::TimedOut { attempts, elapsed })
    }

    async fn wait(&self) -> Result<(), JobError> {
        let sleep = tokio::time::sleep(self.policy.interval);
        match self.cancel {
            None => {
                sleep.await;
                Ok(())
            }
            Some(cancel) => tokio::select! {
                _ = cancel.cancelled() => Err(JobError::Cancelled),
                _ = sleep => Ok(()),
            },
        }
    }
}
