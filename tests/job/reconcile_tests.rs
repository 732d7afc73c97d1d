use gennifer::application::resolve::{resolve_algorithm_instance, resolve_dataset};
use gennifer::application::{clone_study, ResultReconciler};
use gennifer::domain::{
    EdgeWeightStats, Hyperparameters, InferenceStudy, NewStudy, StudyStatus, UserId,
};
use gennifer::remote::{TaskResult, TaskStatusReport};
use gennifer::store::StudyStore;
use gennifer::JobError;

use super::helpers::*;

async fn running_study(store: &RecordingStore, user: &str) -> InferenceStudy {
    let algorithm = store
        .find_algorithm_by_name(ALGORITHM)
        .await
        .unwrap()
        .unwrap();
    let instance = resolve_algorithm_instance(store, &algorithm, &Hyperparameters::Absent)
        .await
        .unwrap();
    let dataset = resolve_dataset(store, ZENODO_ID, &UserId::from(user))
        .await
        .unwrap();
    store
        .create_study(NewStudy {
            algorithm_instance_id: instance.record.id,
            dataset_id: dataset.record.id,
            user: user.into(),
            status: StudyStatus::from("RUNNING"),
            message: None,
            stats: EdgeWeightStats::default(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_malformed_gene_token_aborts_before_writes() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let mut study = running_study(&store, "alice").await;

    let report = success(&[
        ("NCBIGene:672", "NCBIGene:7157", "0.4"),
        ("NCBIGene:7157(c.1A>T", "NCBIGene:1", "0.3"),
    ]);
    let err = ResultReconciler::new(store.as_ref(), &normalizer)
        .reconcile(&mut study, &report)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::MalformedGeneToken(_)));
    assert!(!err.error_context().is_retryable());
    assert_eq!(store.inner().result_count(), 0);
    assert_eq!(store.inner().gene_count(), 0);
    assert!(normalizer.calls().is_empty());
    assert_eq!(
        store.get_study(&study.id).await.unwrap().status,
        StudyStatus::from("RUNNING")
    );
}

#[tokio::test]
async fn test_malformed_edge_weight_reports_row() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let mut study = running_study(&store, "alice").await;

    let report = success(&[
        ("NCBIGene:672", "NCBIGene:7157", "0.4"),
        ("NCBIGene:7157", "NCBIGene:1", "n/a"),
    ]);
    let err = ResultReconciler::new(store.as_ref(), &normalizer)
        .reconcile(&mut study, &report)
        .await
        .unwrap_err();

    match err {
        JobError::MalformedEdgeWeight { row, value } => {
            assert_eq!(row, 1);
            assert_eq!(value, "n/a");
        }
        other => panic!("expected MalformedEdgeWeight, got {:?}", other),
    }
    assert_eq!(store.inner().result_count(), 0);
}

#[tokio::test]
async fn test_success_without_rows_is_unexpected() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let mut study = running_study(&store, "alice").await;

    let report = TaskStatusReport::new("SUCCESS", TaskResult::Message("done".into()));
    let err = ResultReconciler::new(store.as_ref(), &normalizer)
        .reconcile(&mut study, &report)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::UnexpectedResult(_)));
    assert!(store.saved_statuses().is_empty());
}

#[tokio::test]
async fn test_single_row_has_no_std_dev() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let mut study = running_study(&store, "alice").await;

    ResultReconciler::new(store.as_ref(), &normalizer)
        .reconcile(
            &mut study,
            &success(&[("NCBIGene:672", "NCBIGene:7157", "0.75")]),
        )
        .await
        .unwrap();

    assert_eq!(study.status, StudyStatus::Success);
    assert_eq!(study.stats.max, Some(0.75));
    assert_eq!(study.stats.min, Some(0.75));
    assert_eq!(study.stats.mean, Some(0.75));
    assert_eq!(study.stats.std_dev, None);
}

#[tokio::test]
async fn test_genes_are_shared_across_studies() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let reconciler = ResultReconciler::new(store.as_ref(), &normalizer);
    let row = [("NCBIGene:672(c.123A>G)", "NCBIGene:672", "1.0")];

    let mut first = running_study(&store, "alice").await;
    reconciler.reconcile(&mut first, &success(&row)).await.unwrap();
    let mut second = running_study(&store, "bob").await;
    reconciler.reconcile(&mut second, &success(&row)).await.unwrap();

    // The variant and the plain gene are distinct; neither is duplicated.
    assert_eq!(store.inner().gene_count(), 2);
    let a = store.list_results(&first.id).await.unwrap();
    let b = store.list_results(&second.id).await.unwrap();
    assert_eq!(a[0].tf, b[0].tf);
    assert_ne!(a[0].tf, a[0].target);
}

#[tokio::test]
async fn test_clone_belongs_to_new_user_and_is_independent() {
    let store = seeded_store().await;
    let normalizer = StaticNormalizer::new(normalization_payload());
    let mut source = running_study(&store, "alice").await;
    ResultReconciler::new(store.as_ref(), &normalizer)
        .reconcile(
            &mut source,
            &success(&[
                ("NCBIGene:672", "NCBIGene:7157", "0.2"),
                ("NCBIGene:7157", "NCBIGene:1", "0.6"),
            ]),
        )
        .await
        .unwrap();

    let bob = UserId::from("bob");
    let clone = clone_study(store.as_ref(), &source, &bob).await.unwrap();

    assert_ne!(clone.id, source.id);
    assert_eq!(clone.user, bob);
    assert_eq!(clone.status, source.status);
    assert_eq!(clone.stats, source.stats);

    let mut cloned_results = store.list_results(&clone.id).await.unwrap();
    let source_results = store.list_results(&source.id).await.unwrap();
    assert_eq!(cloned_results.len(), source_results.len());
    for (c, s) in cloned_results.iter().zip(&source_results) {
        assert_ne!(c.id, s.id);
        assert_eq!(c.tf, s.tf);
        assert_eq!(c.target, s.target);
        assert_eq!(c.edge_weight, s.edge_weight);
        assert_eq!(c.user, bob);
    }

    cloned_results[0].edge_weight = 99.0;
    store.save_result(&cloned_results[0]).await.unwrap();
    let mut edited = clone.clone();
    edited.message = Some("annotated".into());
    store.save_study(&edited).await.unwrap();

    assert_eq!(store.list_results(&source.id).await.unwrap(), source_results);
    assert_eq!(store.get_study(&source.id).await.unwrap().message, None);
}
