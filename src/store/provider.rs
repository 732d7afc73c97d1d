use async_trait::async_trait;

use crate::domain::{
    Algorithm, AlgorithmId, AlgorithmInstance, Dataset, Gene, GeneId, GeneKey, Hyperparameters,
    InferenceResult, InferenceStudy, NewAlgorithm, NewInferenceResult, NewStudy, StudyId,
    StudyQuery, UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Persisted-state collaborator of the job engine.
///
/// `insert_*` methods must enforce the identity of each entity with a
/// uniqueness constraint and report a duplicate as [`StoreError::Conflict`];
/// get-or-create semantics are layered on top in
/// [`crate::application::resolve`].
#[async_trait]
pub trait StudyStore: Send + Sync {
    async fn insert_algorithm(&self, algorithm: NewAlgorithm) -> Result<Algorithm, StoreError>;

    async fn find_algorithm_by_name(&self, name: &str) -> Result<Option<Algorithm>, StoreError>;

    async fn find_algorithm_instance(
        &self,
        algorithm_id: &AlgorithmId,
        hyperparameters: &Hyperparameters,
    ) -> Result<Option<AlgorithmInstance>, StoreError>;

    async fn insert_algorithm_instance(
        &self,
        algorithm_id: &AlgorithmId,
        hyperparameters: &Hyperparameters,
    ) -> Result<AlgorithmInstance, StoreError>;

    async fn find_dataset(
        &self,
        zenodo_id: &str,
        user: &UserId,
    ) -> Result<Option<Dataset>, StoreError>;

    async fn insert_dataset(&self, zenodo_id: &str, user: &UserId) -> Result<Dataset, StoreError>;

    async fn find_gene(&self, key: &GeneKey) -> Result<Option<Gene>, StoreError>;

    async fn insert_gene(&self, key: &GeneKey) -> Result<Gene, StoreError>;

    async fn get_gene(&self, id: &GeneId) -> Result<Gene, StoreError>;

    async fn create_study(&self, study: NewStudy) -> Result<InferenceStudy, StoreError>;

    async fn get_study(&self, id: &StudyId) -> Result<InferenceStudy, StoreError>;

    async fn save_study(&self, study: &InferenceStudy) -> Result<(), StoreError>;

    /// Studies matching `query`, oldest first.
    async fn find_studies(&self, query: &StudyQuery) -> Result<Vec<InferenceStudy>, StoreError>;

    async fn create_result(
        &self,
        result: NewInferenceResult,
    ) -> Result<InferenceResult, StoreError>;

    async fn save_result(&self, result: &InferenceResult) -> Result<(), StoreError>;

    /// Results of one study in creation order.
    async fn list_results(&self, study_id: &StudyId) -> Result<Vec<InferenceResult>, StoreError>;
}
