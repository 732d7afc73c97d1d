use crate::domain::{
    Algorithm, AlgorithmInstance, Dataset, EdgeWeightStats, Hyperparameters, InferenceStudy,
    NewStudy, StudyStatus, UserId,
};
use crate::error::JobResult;
use crate::remote::{AlgorithmService, JobSubmission, TaskId};
use crate::store::StudyStore;

const PENDING: &str = "PENDING";

/// A submitted remote task and the study tracking it.
#[derive(Debug, Clone)]
pub struct DispatchedJob {
    pub task_id: TaskId,
    pub study: InferenceStudy,
}

pub struct DispatchRequest<'a> {
    pub algorithm: &'a Algorithm,
    pub instance: &'a AlgorithmInstance,
    pub dataset: &'a Dataset,
    pub user: &'a UserId,
    pub hyperparameters: &'a Hyperparameters,
}

/// Submits the task, fetches its initial status once and creates the study
/// in that status. A terminal initial status is recorded as `PENDING` so that
/// the poller observes it and the outcome is written only after it has been
/// handled. Transport failures are returned as-is; nothing is retried.
pub async fn dispatch_job(
    store: &dyn StudyStore,
    service: &dyn AlgorithmService,
    request: DispatchRequest<'_>,
) -> JobResult<DispatchedJob> {
    let submission = JobSubmission {
        zenodo_id: request.dataset.zenodo_id.clone(),
        hyperparameters: request.hyperparameters.clone(),
    };
    let task_id = service.submit(request.algorithm, &submission).await?;
    tracing::info!(
        algorithm = %request.algorithm.name,
        task_id = %task_id,
        tuned = request.hyperparameters.is_present(),
        "dispatched task"
    );

    let initial = service.status(request.algorithm, &task_id).await?.status();
    // SUCCESS/FAILURE/TIMED_OUT are never created directly.
    let status = if initial.is_terminal() {
        StudyStatus::from(PENDING)
    } else {
        initial
    };
    let study = store
        .create_study(NewStudy {
            algorithm_instance_id: request.instance.id.clone(),
            dataset_id: request.dataset.id.clone(),
            user: request.user.clone(),
            status,
            message: None,
            stats: EdgeWeightStats::default(),
        })
        .await?;
    tracing::debug!(study = %study.id, status = %study.status, "created study");

    Ok(DispatchedJob { task_id, study })
}
