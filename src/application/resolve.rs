//! Idempotent get-or-create lookups and the study cache check.
//!
//! Each resolver looks the identity up, inserts on a miss and, when the
//! insert loses a race against a concurrent writer ([`StoreError::Conflict`]),
//! re-fetches the winner's record. The store's uniqueness constraint is what
//! guarantees a single record per identity.

use std::future::Future;

use crate::domain::{
    Algorithm, AlgorithmInstance, Dataset, Gene, GeneKey, Hyperparameters, InferenceStudy,
    StudyQuery, StudyStatus, UserId,
};
use crate::store::{StoreError, StudyStore};

/// A resolved record and whether this call created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub record: T,
    pub created: bool,
}

impl<T> Resolved<T> {
    fn existing(record: T) -> Self {
        Self {
            record,
            created: false,
        }
    }

    fn created(record: T) -> Self {
        Self {
            record,
            created: true,
        }
    }
}

async fn get_or_create<T, Find, FindFut, Insert, InsertFut>(
    find: Find,
    insert: Insert,
) -> Result<Resolved<T>, StoreError>
where
    Find: Fn() -> FindFut,
    FindFut: Future<Output = Result<Option<T>, StoreError>>,
    Insert: FnOnce() -> InsertFut,
    InsertFut: Future<Output = Result<T, StoreError>>,
{
    if let Some(record) = find().await? {
        return Ok(Resolved::existing(record));
    }

    match insert().await {
        Ok(record) => Ok(Resolved::created(record)),
        Err(StoreError::Conflict { entity, key }) => {
            tracing::debug!(entity, key = %key, "insert lost a race, re-fetching");
            find()
                .await?
                .map(Resolved::existing)
                .ok_or(StoreError::NotFound { entity, key })
        }
        Err(e) => Err(e),
    }
}

pub async fn resolve_algorithm_instance(
    store: &dyn StudyStore,
    algorithm: &Algorithm,
    hyperparameters: &Hyperparameters,
) -> Result<Resolved<AlgorithmInstance>, StoreError> {
    get_or_create(
        || store.find_algorithm_instance(&algorithm.id, hyperparameters),
        || store.insert_algorithm_instance(&algorithm.id, hyperparameters),
    )
    .await
}

pub async fn resolve_dataset(
    store: &dyn StudyStore,
    zenodo_id: &str,
    user: &UserId,
) -> Result<Resolved<Dataset>, StoreError> {
    get_or_create(
        || store.find_dataset(zenodo_id, user),
        || store.insert_dataset(zenodo_id, user),
    )
    .await
}

pub async fn resolve_gene(
    store: &dyn StudyStore,
    key: &GeneKey,
) -> Result<Resolved<Gene>, StoreError> {
    get_or_create(|| store.find_gene(key), || store.insert_gene(key)).await
}

/// Returns a prior successful study for the same instance and dataset.
///
/// Skipped when either record was just created, since no study can
/// reference a record that did not exist before this request.
pub async fn find_cached_study(
    store: &dyn StudyStore,
    instance: &Resolved<AlgorithmInstance>,
    dataset: &Resolved<Dataset>,
) -> Result<Option<InferenceStudy>, StoreError> {
    if instance.created || dataset.created {
        return Ok(None);
    }

    let query = StudyQuery {
        algorithm_instance_id: Some(instance.record.id.clone()),
        dataset_id: Some(dataset.record.id.clone()),
        status: Some(StudyStatus::Success),
        ..StudyQuery::default()
    };
    Ok(store.find_studies(&query).await?.into_iter().next())
}
