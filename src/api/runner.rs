//! Job runner and builder.
//!
//! [`JobRunner`] (constructed via [`JobRunnerBuilder`]) is the entry point for
//! submitting inference jobs. It wires the study store, the remote clients and
//! the engine configuration, and executes each submitted job as its own tokio
//! task, bounded by `max_concurrent_jobs`.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tracing::Instrument;

use super::handle::{JobHandle, JobState};
use crate::application::{JobOrchestrator, JobOutcome, JobRequest, JobServices};
use crate::core::{build_http_client, CancelSignal, EngineConfig};
use crate::error::{ErrorSeverity, JobError, JobResult};
use crate::remote::{AlgorithmService, HttpAlgorithmService, HttpNodeNormalizer, NodeNormalizer};
use crate::store::StudyStore;

pub struct JobRunnerBuilder {
    store: Arc<dyn StudyStore>,
    algorithms: Option<Arc<dyn AlgorithmService>>,
    normalizer: Option<Arc<dyn NodeNormalizer>>,
    config: EngineConfig,
}

impl JobRunnerBuilder {
    pub fn algorithm_service(mut self, service: Arc<dyn AlgorithmService>) -> Self {
        self.algorithms = Some(service);
        self
    }

    pub fn normalizer(mut self, normalizer: Arc<dyn NodeNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the runner. Clients not supplied explicitly are HTTP clients
    /// configured from [`EngineConfig`].
    pub fn build(self) -> JobResult<JobRunner> {
        let needs_http = self.algorithms.is_none() || self.normalizer.is_none();
        let client = if needs_http {
            Some(build_http_client(&self.config.http)?)
        } else {
            None
        };

        let algorithms = match (self.algorithms, &client) {
            (Some(service), _) => service,
            (None, Some(client)) => Arc::new(HttpAlgorithmService::new(client.clone())),
            (None, None) => {
                return Err(JobError::Internal("no algorithm service".to_string()))
            }
        };
        let normalizer = match (self.normalizer, &client) {
            (Some(normalizer), _) => normalizer,
            (None, Some(client)) => Arc::new(HttpNodeNormalizer::new(
                self.config.node_normalizer_url.clone(),
                client.clone(),
            )),
            (None, None) => return Err(JobError::Internal("no node normalizer".to_string())),
        };

        let services = JobServices {
            store: self.store,
            algorithms,
            normalizer,
        };
        let permits = self.config.max_concurrent_jobs.max(1);
        Ok(JobRunner {
            orchestrator: Arc::new(JobOrchestrator::new(services, self.config.poll_policy())),
            permits: Arc::new(Semaphore::new(permits)),
        })
    }
}

#[derive(Clone)]
pub struct JobRunner {
    orchestrator: Arc<JobOrchestrator>,
    permits: Arc<Semaphore>,
}

impl JobRunner {
    pub fn builder(store: Arc<dyn StudyStore>) -> JobRunnerBuilder {
        JobRunnerBuilder {
            store,
            algorithms: None,
            normalizer: None,
            config: EngineConfig::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn StudyStore> {
        &self.orchestrator.services().store
    }

    /// Runs one job attempt on the current task and returns its outcome.
    pub async fn run(&self, request: &JobRequest) -> JobResult<JobOutcome> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| JobError::Internal("job queue closed".to_string()))?;
        self.orchestrator
            .run(request, None)
            .instrument(job_span(request))
            .await
    }

    /// Queues a job attempt and returns immediately. Must be called from
    /// within a tokio runtime.
    pub fn submit(&self, request: JobRequest) -> JobHandle {
        let (state_tx, state_rx) = watch::channel(JobState::Queued);
        let cancel = CancelSignal::new();
        let orchestrator = self.orchestrator.clone();
        let permits = self.permits.clone();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let _permit = tokio::select! {
                permit = permits.acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        state_tx.send_replace(JobState::Failed("job queue closed".to_string()));
                        return;
                    }
                },
                _ = task_cancel.cancelled() => {
                    state_tx.send_replace(JobState::Failed(JobError::Cancelled.to_string()));
                    return;
                }
            };

            state_tx.send_replace(JobState::Running);
            let span = job_span(&request);
            let result = orchestrator
                .run(&request, Some(&task_cancel))
                .instrument(span.clone())
                .await;

            let state = match result {
                Ok(outcome) => {
                    span.in_scope(|| {
                        tracing::info!(
                            study = %outcome.study().id,
                            status = %outcome.study().status,
                            "job finished"
                        )
                    });
                    JobState::Succeeded(outcome)
                }
                Err(e) => {
                    let ctx = e.error_context();
                    span.in_scope(|| match ctx.severity {
                        ErrorSeverity::Warning => tracing::warn!(
                            code = ?ctx.code,
                            error = %e,
                            "job stopped"
                        ),
                        _ => tracing::error!(
                            code = ?ctx.code,
                            retryable = ctx.is_retryable(),
                            http_status = ctx.http_status,
                            error = %e,
                            "job failed"
                        ),
                    });
                    JobState::Failed(e.to_string())
                }
            };
            state_tx.send_replace(state);
        });

        JobHandle::new(state_rx, cancel)
    }
}

fn job_span(request: &JobRequest) -> tracing::Span {
    tracing::info_span!(
        "gennifer_job",
        algorithm = %request.algorithm_name,
        zenodo_id = %request.zenodo_id,
        user = %request.user,
    )
}
