use serde::{Deserialize, Serialize};

use super::hyperparameters::Hyperparameters;
use super::ids::{AlgorithmId, AlgorithmInstanceId, DatasetId, UserId};

/// A registered inference algorithm and the base URL of its remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    pub id: AlgorithmId,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlgorithm {
    pub name: String,
    pub url: String,
}

impl NewAlgorithm {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An algorithm paired with one hyperparameter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmInstance {
    pub id: AlgorithmInstanceId,
    pub algorithm_id: AlgorithmId,
    pub hyperparameters: Hyperparameters,
}

/// Uniqueness key of an [`AlgorithmInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmInstanceKey {
    pub algorithm_id: AlgorithmId,
    pub hyperparameters: Option<String>,
}

impl AlgorithmInstanceKey {
    pub fn new(algorithm_id: &AlgorithmId, hyperparameters: &Hyperparameters) -> Self {
        Self {
            algorithm_id: algorithm_id.clone(),
            hyperparameters: hyperparameters.canonical_key(),
        }
    }
}

impl AlgorithmInstance {
    pub fn key(&self) -> AlgorithmInstanceKey {
        AlgorithmInstanceKey::new(&self.algorithm_id, &self.hyperparameters)
    }
}

/// A Zenodo-archived dataset as uploaded by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub zenodo_id: String,
    pub upload_user: UserId,
}
