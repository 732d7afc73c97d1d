//! Job-level error types.

use thiserror::Error;

use super::{ErrorCode, ErrorContext};
use crate::core::config::ConfigError;
use crate::domain::GeneTokenError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Errors that abort a job attempt.
///
/// A remote `FAILURE` status is not an error: it is recorded on the study and
/// the attempt still succeeds.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Algorithm not found: {0}")]
    AlgorithmNotFound(String),
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Malformed gene token: {0}")]
    MalformedGeneToken(#[from] GeneTokenError),
    #[error("Malformed edge weight in row {row}: {value}")]
    MalformedEdgeWeight { row: usize, value: String },
    #[error("Unexpected task result: {0}")]
    UnexpectedResult(String),
    #[error("Job cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobError {
    pub fn code(&self) -> ErrorCode {
        match self {
            JobError::AlgorithmNotFound(_) => ErrorCode::AlgorithmNotFound,
            JobError::Remote(RemoteError::Network(_)) => ErrorCode::NetworkError,
            JobError::Remote(RemoteError::Api { status, .. }) if *status >= 500 => {
                ErrorCode::HttpServerError
            }
            JobError::Remote(RemoteError::Api { .. }) => ErrorCode::HttpClientError,
            JobError::Remote(RemoteError::Decode(_)) => ErrorCode::DecodeError,
            JobError::Store(StoreError::Conflict { .. }) => ErrorCode::StoreConflict,
            JobError::Store(StoreError::NotFound { .. }) => ErrorCode::StoreNotFound,
            JobError::Store(StoreError::Backend(_)) => ErrorCode::StoreBackendError,
            JobError::MalformedGeneToken(_) => ErrorCode::MalformedGeneToken,
            JobError::MalformedEdgeWeight { .. } => ErrorCode::MalformedEdgeWeight,
            JobError::UnexpectedResult(_) => ErrorCode::UnexpectedResult,
            JobError::Cancelled => ErrorCode::Cancelled,
            JobError::Config(_) => ErrorCode::ConfigError,
            JobError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn error_context(&self) -> ErrorContext {
        let ctx = ErrorContext::new(self.code(), self.to_string());
        match self {
            JobError::Remote(RemoteError::Api { status, .. }) => ctx.with_http_status(*status),
            _ => ctx,
        }
    }
}
