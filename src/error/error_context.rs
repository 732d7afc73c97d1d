use serde::{Deserialize, Serialize};

/// Whether resubmitting the same job request unchanged may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorRetryability {
    Retryable,
    NonRetryable,
}

/// Log level a failed attempt is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Warning,
    Error,
    Fatal,
}

/// Classification of a failed job attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Engine
    ConfigError,
    InternalError,
    Cancelled,

    // Remote services
    NetworkError,
    HttpClientError,
    HttpServerError,
    DecodeError,

    // Study store
    StoreConflict,
    StoreNotFound,
    StoreBackendError,

    // Request and result content
    AlgorithmNotFound,
    MalformedGeneToken,
    MalformedEdgeWeight,
    UnexpectedResult,
}

impl ErrorCode {
    /// Transient infrastructure failures are retryable; anything caused by
    /// the request or the returned data is not.
    pub fn retryability(self) -> ErrorRetryability {
        match self {
            ErrorCode::NetworkError
            | ErrorCode::HttpServerError
            | ErrorCode::StoreConflict
            | ErrorCode::StoreBackendError => ErrorRetryability::Retryable,
            _ => ErrorRetryability::NonRetryable,
        }
    }

    pub fn severity(self) -> ErrorSeverity {
        match self {
            ErrorCode::Cancelled | ErrorCode::StoreConflict => ErrorSeverity::Warning,
            ErrorCode::ConfigError | ErrorCode::InternalError => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Structured description of why a job attempt failed, attached to the
/// runner's failure log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub retryability: ErrorRetryability,
    pub severity: ErrorSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ErrorContext {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            retryability: code.retryability(),
            severity: code.severity(),
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryability == ErrorRetryability::Retryable
    }
}
