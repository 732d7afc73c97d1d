use crate::domain::{InferenceStudy, NewInferenceResult, NewStudy, UserId};
use crate::store::{StoreError, StudyStore};

/// Copies a finished study and all of its results to `user`.
///
/// The copy gets a new identity and owner; gene references, weights, status
/// and statistics are shared with the source, which is left untouched.
pub async fn clone_study(
    store: &dyn StudyStore,
    source: &InferenceStudy,
    user: &UserId,
) -> Result<InferenceStudy, StoreError> {
    let study = store
        .create_study(NewStudy {
            algorithm_instance_id: source.algorithm_instance_id.clone(),
            dataset_id: source.dataset_id.clone(),
            user: user.clone(),
            status: source.status.clone(),
            message: source.message.clone(),
            stats: source.stats,
        })
        .await?;

    let results = store.list_results(&source.id).await?;
    for result in &results {
        store
            .create_result(NewInferenceResult {
                tf: result.tf.clone(),
                target: result.target.clone(),
                edge_weight: result.edge_weight,
                study_id: study.id.clone(),
                user: user.clone(),
            })
            .await?;
    }

    tracing::info!(
        source = %source.id,
        study = %study.id,
        results = results.len(),
        "cloned cached study"
    );
    Ok(study)
}
