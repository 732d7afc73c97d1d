//! Entities persisted by the study store.

mod algorithm;
mod gene;
mod hyperparameters;
mod ids;
mod study;

pub use algorithm::{Algorithm, AlgorithmInstance, AlgorithmInstanceKey, Dataset, NewAlgorithm};
pub use gene::{parse_gene_token, Gene, GeneKey, GeneToken, GeneTokenError};
pub use hyperparameters::{
    HyperparameterError, HyperparameterMap, HyperparameterValue, Hyperparameters,
};
pub use ids::{AlgorithmId, AlgorithmInstanceId, DatasetId, GeneId, ResultId, StudyId, UserId};
pub use study::{
    EdgeWeightStats, InferenceResult, InferenceStudy, NewInferenceResult, NewStudy, StudyQuery,
    StudyStatus,
};
