use async_trait::async_trait;
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use serde::de::DeserializeOwned;

use super::error::RemoteError;
use super::types::{JobSubmission, SubmitResponse, TaskId, TaskStatusReport};
use crate::domain::Algorithm;

/// Client of a remote algorithm service. The base URL comes from the
/// [`Algorithm`] record, so one client serves every algorithm.
#[async_trait]
pub trait AlgorithmService: Send + Sync {
    async fn submit(
        &self,
        algorithm: &Algorithm,
        submission: &JobSubmission,
    ) -> Result<TaskId, RemoteError>;

    async fn status(
        &self,
        algorithm: &Algorithm,
        task_id: &TaskId,
    ) -> Result<TaskStatusReport, RemoteError>;
}

pub struct HttpAlgorithmService {
    client: reqwest::Client,
}

impl HttpAlgorithmService {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn endpoint(algorithm: &Algorithm, path: &str) -> String {
        format!("{}/{}", algorithm.url.trim_end_matches('/'), path)
    }
}

impl Default for HttpAlgorithmService {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message: text,
        });
    }
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl AlgorithmService for HttpAlgorithmService {
    async fn submit(
        &self,
        algorithm: &Algorithm,
        submission: &JobSubmission,
    ) -> Result<TaskId, RemoteError> {
        let response = self
            .client
            .post(Self::endpoint(algorithm, "run"))
            .json(submission)
            .send()
            .await?;
        let body: SubmitResponse = decode_json(response).await?;
        Ok(body.task_id)
    }

    async fn status(
        &self,
        algorithm: &Algorithm,
        task_id: &TaskId,
    ) -> Result<TaskStatusReport, RemoteError> {
        let response = self
            .client
            .get(Self::endpoint(algorithm, &format!("status/{}", task_id)))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await?;
        decode_json(response).await
    }
}
