use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::provider::{StoreError, StudyStore};
use crate::core::RuntimeContext;
use crate::domain::{
    Algorithm, AlgorithmId, AlgorithmInstance, AlgorithmInstanceId, AlgorithmInstanceKey, Dataset,
    DatasetId, Gene, GeneId, GeneKey, Hyperparameters, InferenceResult, InferenceStudy,
    NewAlgorithm, NewInferenceResult, NewStudy, ResultId, StudyId, StudyQuery, UserId,
};

#[derive(Default)]
struct Tables {
    algorithms: HashMap<AlgorithmId, Algorithm>,
    algorithm_names: HashMap<String, AlgorithmId>,
    instances: HashMap<AlgorithmInstanceId, AlgorithmInstance>,
    instance_index: HashMap<AlgorithmInstanceKey, AlgorithmInstanceId>,
    datasets: HashMap<DatasetId, Dataset>,
    dataset_index: HashMap<(String, UserId), DatasetId>,
    genes: HashMap<GeneId, Gene>,
    gene_index: HashMap<GeneKey, GeneId>,
    studies: Vec<InferenceStudy>,
    study_index: HashMap<StudyId, usize>,
    results: Vec<InferenceResult>,
    result_index: HashMap<ResultId, usize>,
}

/// Reference [`StudyStore`] kept in process memory.
///
/// Unique indexes are checked and written under one write lock, so concurrent
/// inserts of the same identity yield exactly one record and a
/// [`StoreError::Conflict`] for the losers.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    context: RuntimeContext,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_context(RuntimeContext::default())
    }

    pub fn with_context(context: RuntimeContext) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            context,
        }
    }

    pub fn algorithm_instance_count(&self) -> usize {
        self.tables.read().instances.len()
    }

    pub fn dataset_count(&self) -> usize {
        self.tables.read().datasets.len()
    }

    pub fn gene_count(&self) -> usize {
        self.tables.read().genes.len()
    }

    pub fn study_count(&self) -> usize {
        self.tables.read().studies.len()
    }

    pub fn result_count(&self) -> usize {
        self.tables.read().results.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudyStore for InMemoryStore {
    async fn insert_algorithm(&self, algorithm: NewAlgorithm) -> Result<Algorithm, StoreError> {
        let mut guard = self.tables.write();
        if guard.algorithm_names.contains_key(&algorithm.name) {
            return Err(StoreError::Conflict {
                entity: "algorithm",
                key: algorithm.name,
            });
        }
        let record = Algorithm {
            id: AlgorithmId::from(self.context.next_id()),
            name: algorithm.name,
            url: algorithm.url,
        };
        guard
            .algorithm_names
            .insert(record.name.clone(), record.id.clone());
        guard.algorithms.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_algorithm_by_name(&self, name: &str) -> Result<Option<Algorithm>, StoreError> {
        let guard = self.tables.read();
        Ok(guard
            .algorithm_names
            .get(name)
            .and_then(|id| guard.algorithms.get(id))
            .cloned())
    }

    async fn find_algorithm_instance(
        &self,
        algorithm_id: &AlgorithmId,
        hyperparameters: &Hyperparameters,
    ) -> Result<Option<AlgorithmInstance>, StoreError> {
        let key = AlgorithmInstanceKey::new(algorithm_id, hyperparameters);
        let guard = self.tables.read();
        Ok(guard
            .instance_index
            .get(&key)
            .and_then(|id| guard.instances.get(id))
            .cloned())
    }

    async fn insert_algorithm_instance(
        &self,
        algorithm_id: &AlgorithmId,
        hyperparameters: &Hyperparameters,
    ) -> Result<AlgorithmInstance, StoreError> {
        let key = AlgorithmInstanceKey::new(algorithm_id, hyperparameters);
        let mut guard = self.tables.write();
        if !guard.algorithms.contains_key(algorithm_id) {
            return Err(StoreError::NotFound {
                entity: "algorithm",
                key: algorithm_id.to_string(),
            });
        }
        if guard.instance_index.contains_key(&key) {
            return Err(StoreError::Conflict {
                entity: "algorithm instance",
                key: format!(
                    "{}/{}",
                    algorithm_id,
                    key.hyperparameters.as_deref().unwrap_or("<none>")
                ),
            });
        }
        let record = AlgorithmInstance {
            id: AlgorithmInstanceId::from(self.context.next_id()),
            algorithm_id: algorithm_id.clone(),
            hyperparameters: hyperparameters.clone(),
        };
        guard.instance_index.insert(key, record.id.clone());
        guard.instances.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_dataset(
        &self,
        zenodo_id: &str,
        user: &UserId,
    ) -> Result<Option<Dataset>, StoreError> {
        let guard = self.tables.read();
        Ok(guard
            .dataset_index
            .get(&(zenodo_id.to_string(), user.clone()))
            .and_then(|id| guard.datasets.get(id))
            .cloned())
    }

    async fn insert_dataset(&self, zenodo_id: &str, user: &UserId) -> Result<Dataset, StoreError> {
        let key = (zenodo_id.to_string(), user.clone());
        let mut guard = self.tables.write();
        if guard.dataset_index.contains_key(&key) {
            return Err(StoreError::Conflict {
                entity: "dataset",
                key: format!("{}/{}", zenodo_id, user),
            });
        }
        let record = Dataset {
            id: DatasetId::from(self.context.next_id()),
            zenodo_id: zenodo_id.to_string(),
            upload_user: user.clone(),
        };
        guard.dataset_index.insert(key, record.id.clone());
        guard.datasets.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn find_gene(&self, key: &GeneKey) -> Result<Option<Gene>, StoreError> {
        let guard = self.tables.read();
        Ok(guard
            .gene_index
            .get(key)
            .and_then(|id| guard.genes.get(id))
            .cloned())
    }

    async fn insert_gene(&self, key: &GeneKey) -> Result<Gene, StoreError> {
        let mut guard = self.tables.write();
        if guard.gene_index.contains_key(key) {
            return Err(StoreError::Conflict {
                entity: "gene",
                key: format!("{}/{:?}", key.curie, key.variant),
            });
        }
        let record = Gene {
            id: GeneId::from(self.context.next_id()),
            name: key.name.clone(),
            curie: key.curie.clone(),
            variant: key.variant.clone(),
            preferred_curie: key.preferred_curie.clone(),
        };
        guard.gene_index.insert(key.clone(), record.id.clone());
        guard.genes.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_gene(&self, id: &GeneId) -> Result<Gene, StoreError> {
        self.tables
            .read()
            .genes
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "gene",
                key: id.to_string(),
            })
    }

    async fn create_study(&self, study: NewStudy) -> Result<InferenceStudy, StoreError> {
        let record = InferenceStudy {
            id: StudyId::from(self.context.next_id()),
            algorithm_instance_id: study.algorithm_instance_id,
            dataset_id: study.dataset_id,
            user: study.user,
            status: study.status,
            message: study.message,
            stats: study.stats,
            created_at: self.context.now(),
        };
        let mut guard = self.tables.write();
        let position = guard.studies.len();
        guard.study_index.insert(record.id.clone(), position);
        guard.studies.push(record.clone());
        Ok(record)
    }

    async fn get_study(&self, id: &StudyId) -> Result<InferenceStudy, StoreError> {
        let guard = self.tables.read();
        guard
            .study_index
            .get(id)
            .map(|&i| guard.studies[i].clone())
            .ok_or_else(|| StoreError::NotFound {
                entity: "study",
                key: id.to_string(),
            })
    }

    async fn save_study(&self, study: &InferenceStudy) -> Result<(), StoreError> {
        let mut guard = self.tables.write();
        let Some(&i) = guard.study_index.get(&study.id) else {
            return Err(StoreError::NotFound {
                entity: "study",
                key: study.id.to_string(),
            });
        };
        guard.studies[i] = study.clone();
        Ok(())
    }

    async fn find_studies(&self, query: &StudyQuery) -> Result<Vec<InferenceStudy>, StoreError> {
        Ok(self
            .tables
            .read()
            .studies
            .iter()
            .filter(|study| query.matches(study))
            .cloned()
            .collect())
    }

    async fn create_result(
        &self,
        result: NewInferenceResult,
    ) -> Result<InferenceResult, StoreError> {
        let record = InferenceResult {
            id: ResultId::from(self.context.next_id()),
            tf: result.tf,
            target: result.target,
            edge_weight: result.edge_weight,
            study_id: result.study_id,
            user: result.user,
        };
        let mut guard = self.tables.write();
        if !guard.study_index.contains_key(&record.study_id) {
            return Err(StoreError::NotFound {
                entity: "study",
                key: record.study_id.to_string(),
            });
        }
        let position = guard.results.len();
        guard.result_index.insert(record.id.clone(), position);
        guard.results.push(record.clone());
        Ok(record)
    }

    async fn save_result(&self, result: &InferenceResult) -> Result<(), StoreError> {
        let mut guard = self.tables.write();
        let Some(&i) = guard.result_index.get(&result.id) else {
            return Err(StoreError::NotFound {
                entity: "inference result",
                key: result.id.to_string(),
            });
        };
        guard.results[i] = result.clone();
        Ok(())
    }

    async fn list_results(&self, study_id: &StudyId) -> Result<Vec<InferenceResult>, StoreError> {
        Ok(self
            .tables
            .read()
            .results
            .iter()
            .filter(|r| r.study_id == *study_id)
            .cloned()
            .collect())
    }
}
