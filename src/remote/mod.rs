//! Clients of the external services: the per-algorithm job service and the
//! shared node normalizer.

pub mod algorithm;
pub mod error;
pub mod normalizer;
pub mod types;

pub use algorithm::{AlgorithmService, HttpAlgorithmService};
pub use error::RemoteError;
pub use normalizer::{HttpNodeNormalizer, NodeNormalizer};
pub use types::{
    EdgeWeightField, EquivalentIdentifier, JobSubmission, NodeIdentity, NormalizationResponse,
    NormalizedNode, ResultRow, TaskId, TaskResult, TaskStatusReport,
};
