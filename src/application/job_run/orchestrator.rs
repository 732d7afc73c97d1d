use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::dispatch::{dispatch_job, DispatchRequest};
use super::poller::{PollOutcome, StatusPoller};
use crate::application::clone::clone_study;
use crate::application::reconcile::ResultReconciler;
use crate::application::resolve::{find_cached_study, resolve_algorithm_instance, resolve_dataset};
use crate::core::{CancelSignal, PollPolicy};
use crate::domain::{Hyperparameters, InferenceStudy, StudyStatus, UserId};
use crate::error::{JobError, JobResult};
use crate::remote::{AlgorithmService, NodeNormalizer};
use crate::store::StudyStore;

/// A request to run one algorithm over one dataset on behalf of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub algorithm_name: String,
    pub zenodo_id: String,
    #[serde(default)]
    pub hyperparameters: Hyperparameters,
    pub user: UserId,
}

impl JobRequest {
    pub fn new(
        algorithm_name: impl Into<String>,
        zenodo_id: impl Into<String>,
        hyperparameters: Hyperparameters,
        user: impl Into<UserId>,
    ) -> Self {
        Self {
            algorithm_name: algorithm_name.into(),
            zenodo_id: zenodo_id.into(),
            hyperparameters,
            user: user.into(),
        }
    }
}

/// Terminal result of a job attempt that ran to completion.
///
/// `Failed` and `TimedOut` describe the remote computation; the attempt
/// itself still reported its outcome successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Cloned(InferenceStudy),
    Completed(InferenceStudy),
    Failed(InferenceStudy),
    TimedOut(InferenceStudy),
}

impl JobOutcome {
    pub fn study(&self) -> &InferenceStudy {
        match self {
            JobOutcome::Cloned(study)
            | JobOutcome::Completed(study)
            | JobOutcome::Failed(study)
            | JobOutcome::TimedOut(study) => study,
        }
    }

    pub fn into_study(self) -> InferenceStudy {
        match self {
            JobOutcome::Cloned(study)
            | JobOutcome::Completed(study)
            | JobOutcome::Failed(study)
            | JobOutcome::TimedOut(study) => study,
        }
    }
}

/// Collaborators a job attempt talks to.
#[derive(Clone)]
pub struct JobServices {
    pub store: Arc<dyn StudyStore>,
    pub algorithms: Arc<dyn AlgorithmService>,
    pub normalizer: Arc<dyn NodeNormalizer>,
}

/// Runs the full lifecycle of one job attempt.
pub struct JobOrchestrator {
    services: JobServices,
    policy: PollPolicy,
}

impl JobOrchestrator {
    pub fn new(services: JobServices, policy: PollPolicy) -> Self {
        Self { services, policy }
    }

    pub fn services(&self) -> &JobServices {
        &self.services
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub async fn run(
        &self,
        request: &JobRequest,
        cancel: Option<&CancelSignal>,
    ) -> JobResult<JobOutcome> {
        let store = self.services.store.as_ref();

        let algorithm = store
            .find_algorithm_by_name(&request.algorithm_name)
            .await?
            .ok_or_else(|| JobError::AlgorithmNotFound(request.algorithm_name.clone()))?;
        let instance =
            resolve_algorithm_instance(store, &algorithm, &request.hyperparameters).await?;
        let dataset = resolve_dataset(store, &request.zenodo_id, &request.user).await?;

        if let Some(cached) = find_cached_study(store, &instance, &dataset).await? {
            tracing::info!(
                algorithm = %algorithm.name,
                zenodo_id = %request.zenodo_id,
                source = %cached.id,
                "reusing successful study"
            );
            let study = clone_study(store, &cached, &request.user).await?;
            return Ok(JobOutcome::Cloned(study));
        }

        let dispatched = dispatch_job(
            store,
            self.services.algorithms.as_ref(),
            DispatchRequest {
                algorithm: &algorithm,
                instance: &instance.record,
                dataset: &dataset.record,
                user: &request.user,
                hyperparameters: &request.hyperparameters,
            },
        )
        .await?;
        let task_id = dispatched.task_id;
        let mut study = dispatched.study;

        let outcome = StatusPoller::new(store, self.services.algorithms.as_ref(), &self.policy)
            .with_cancel(cancel)
            .poll(&algorithm, &task_id, &mut study)
            .await?;

        match outcome {
            PollOutcome::Succeeded(report) => {
                ResultReconciler::new(store, self.services.normalizer.as_ref())
                    .reconcile(&mut study, &report)
                    .await?;
                Ok(JobOutcome::Completed(study))
            }
            PollOutcome::Failed(report) => {
                study.status = StudyStatus::Failure;
                study.message = Some(report.failure_message());
                store.save_study(&study).await?;
                tracing::warn!(
                    study = %study.id,
                    task_id = %task_id,
                    message = study.message.as_deref().unwrap_or_default(),
                    "remote task failed"
                );
                Ok(JobOutcome::Failed(study))
            }
            PollOutcome::TimedOut { attempts, elapsed } => {
                study.status = StudyStatus::TimedOut;
                study.message = Some(format!(
                    "task {} reported no terminal status after {} polls ({:.1}s)",
                    task_id,
                    attempts,
                    elapsed.as_secs_f64()
                ));
                store.save_study(&study).await?;
                Ok(JobOutcome::TimedOut(study))
            }
        }
    }
}
