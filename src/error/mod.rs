//! Error types for the job engine.
//!
//! - [`JobError`]: Errors that abort a job attempt.
//! - [`ErrorContext`]: Structured error metadata (code, retryability, severity).
//!
//! Lower layers keep their own enums ([`crate::remote::RemoteError`],
//! [`crate::store::StoreError`]) which convert into [`JobError`].

pub mod error_context;
pub mod job_error;

pub use error_context::{ErrorCode, ErrorContext, ErrorRetryability, ErrorSeverity};
pub use job_error::JobError;

/// Convenience alias for job-level results.
pub type JobResult<T> = Result<T, JobError>;
