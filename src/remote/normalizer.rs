use async_trait::async_trait;

use super::algorithm::decode_json;
use super::error::RemoteError;
use super::types::{NormalizationRequest, NormalizationResponse};

/// Batch lookup of canonical node identities.
#[async_trait]
pub trait NodeNormalizer: Send + Sync {
    async fn normalize(&self, curies: &[String]) -> Result<NormalizationResponse, RemoteError>;
}

pub struct HttpNodeNormalizer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNodeNormalizer {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NodeNormalizer for HttpNodeNormalizer {
    async fn normalize(&self, curies: &[String]) -> Result<NormalizationResponse, RemoteError> {
        let url = format!(
            "{}/get_normalized_nodes",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .json(&NormalizationRequest { curies })
            .send()
            .await?;
        decode_json(response).await
    }
}
