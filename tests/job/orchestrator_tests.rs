use std::time::Duration;

use gennifer::domain::{Hyperparameters, StudyQuery, StudyStatus};
use gennifer::remote::TaskStatusReport;
use gennifer::store::StudyStore;
use gennifer::{JobError, JobOutcome, JobRequest};
use serde_json::json;

use super::helpers::*;

const TIMEOUT: Duration = Duration::from_secs(5);

fn request(user: &str) -> JobRequest {
    JobRequest::new(ALGORITHM, ZENODO_ID, Hyperparameters::Absent, user)
}

fn edges() -> TaskStatusReport {
    success(&[
        ("NCBIGene:672(c.123A>G)", "NCBIGene:7157", "0.5"),
        ("NCBIGene:7157", "NCBIGene:1", "1.5"),
        ("NCBIGene:1", "NCBIGene:672(c.123A>G)", "2.5"),
    ])
}

#[tokio::test]
async fn test_completed_job_persists_results_and_stats() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![status("PENDING"), edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let outcome = with_timeout(
        "run",
        TIMEOUT,
        harness.orchestrator(fast_policy()).run(&request("alice"), None),
    )
    .await
    .unwrap();

    let study = match outcome {
        JobOutcome::Completed(study) => study,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert_eq!(study.status, StudyStatus::Success);
    assert_eq!(study.message, None);
    assert_eq!(study.stats.max, Some(2.5));
    assert_eq!(study.stats.min, Some(0.5));
    assert_eq!(study.stats.mean, Some(1.5));
    assert!((study.stats.std_dev.unwrap() - 1.0).abs() < 1e-9);

    let persisted = harness.store.get_study(&study.id).await.unwrap();
    assert_eq!(persisted, study);

    let edges = harness.gene_names(&study.id).await;
    assert_eq!(
        edges,
        vec![
            ("BRCA1".to_string(), "TP53".to_string(), 0.5),
            ("TP53".to_string(), "A1BG".to_string(), 1.5),
            ("A1BG".to_string(), "BRCA1".to_string(), 2.5),
        ]
    );
    // Three distinct (curie, variant) genes across six endpoints.
    assert_eq!(harness.store.inner().gene_count(), 3);

    let submissions = harness.service.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, ALGORITHM_URL);
    assert_eq!(submissions[0].1.zenodo_id, ZENODO_ID);
}

#[tokio::test]
async fn test_gene_variant_and_preferred_curie_are_recorded() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let study = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap()
        .into_study();

    let results = harness.store.list_results(&study.id).await.unwrap();
    let brca1 = harness.store.get_gene(&results[0].tf).await.unwrap();
    assert_eq!(brca1.curie, "NCBIGene:672");
    assert_eq!(brca1.variant.as_deref(), Some("c.123A>G"));
    assert_eq!(
        brca1.preferred_curie.as_deref(),
        Some("ENSEMBL:ENSG00000012048")
    );

    let a1bg = harness.store.get_gene(&results[1].target).await.unwrap();
    assert_eq!(a1bg.name, "A1BG");
    assert_eq!(a1bg.preferred_curie, None);
}

#[tokio::test]
async fn test_unresolved_genes_fall_back_to_not_found_label() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![success(&[
            ("NCBIGene:999999", "NCBIGene:7157", "0.1"),
            ("NCBIGene:424242", "NCBIGene:7157", "0.2"),
        ])]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let study = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap()
        .into_study();

    let results = harness.store.list_results(&study.id).await.unwrap();
    for result in &results {
        let tf = harness.store.get_gene(&result.tf).await.unwrap();
        assert_eq!(tf.name, "Not found in SRI Node Normalizer.");
        assert_eq!(tf.preferred_curie, None);
    }
    // Fallback genes keep their own curie identity.
    assert_ne!(results[0].tf, results[1].tf);
    assert_eq!(results[0].target, results[1].target);

    let calls = harness.normalizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec!["NCBIGene:424242", "NCBIGene:7157", "NCBIGene:999999"]
    );
}

#[tokio::test]
async fn test_remote_failure_records_message() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![status("STARTED"), failure("out of memory")]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let outcome = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap();

    let study = match outcome {
        JobOutcome::Failed(study) => study,
        other => panic!("expected Failed, got {:?}", other),
    };
    assert_eq!(study.status, StudyStatus::Failure);
    assert_eq!(study.message.as_deref(), Some("out of memory"));
    assert_eq!(harness.store.get_study(&study.id).await.unwrap(), study);
    assert_eq!(harness.store.inner().result_count(), 0);
    assert!(harness.normalizer.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_algorithm_fails_before_any_write() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let err = harness
        .orchestrator(fast_policy())
        .run(
            &JobRequest::new("PIDC", ZENODO_ID, Hyperparameters::Absent, "alice"),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::AlgorithmNotFound(ref name) if name == "PIDC"));
    assert_eq!(harness.service.submit_count(), 0);
    assert_eq!(harness.store.inner().algorithm_instance_count(), 0);
    assert_eq!(harness.store.inner().dataset_count(), 0);
}

#[tokio::test]
async fn test_submit_failure_creates_no_study() {
    let harness = Harness::new(
        ScriptedAlgorithmService::failing_submit("connection refused"),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let err = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Remote(_)));
    assert!(err.error_context().is_retryable());
    assert_eq!(harness.store.inner().study_count(), 0);
    // Resolved records stay behind and are reused by the next attempt.
    assert_eq!(harness.store.inner().algorithm_instance_count(), 1);
    assert_eq!(harness.store.inner().dataset_count(), 1);
}

#[tokio::test]
async fn test_repeat_request_clones_successful_study() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;
    let orchestrator = harness.orchestrator(fast_policy());

    let first = orchestrator
        .run(&request("alice"), None)
        .await
        .unwrap()
        .into_study();
    let second = orchestrator.run(&request("alice"), None).await.unwrap();

    let clone = match second {
        JobOutcome::Cloned(study) => study,
        other => panic!("expected Cloned, got {:?}", other),
    };
    assert_ne!(clone.id, first.id);
    assert_eq!(clone.status, StudyStatus::Success);
    assert_eq!(clone.stats, first.stats);
    assert_eq!(clone.algorithm_instance_id, first.algorithm_instance_id);
    assert_eq!(clone.dataset_id, first.dataset_id);

    // No second dispatch and no extra normalization.
    assert_eq!(harness.service.submit_count(), 1);
    assert_eq!(harness.normalizer.calls().len(), 1);

    assert_eq!(
        harness.gene_names(&clone.id).await,
        harness.gene_names(&first.id).await
    );
    assert_eq!(harness.store.inner().gene_count(), 3);
}

#[tokio::test]
async fn test_study_interrupted_after_early_success_is_not_reused() {
    // The task already reports SUCCESS at dispatch, then the connection drops.
    let harness = Harness::new(
        ScriptedAlgorithmService::with_results(vec![
            Ok(edges()),
            Err("connection reset".into()),
        ]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;
    let orchestrator = harness.orchestrator(fast_policy());

    let err = orchestrator.run(&request("alice"), None).await.unwrap_err();
    assert!(matches!(err, JobError::Remote(_)));

    let left_behind = harness
        .store
        .find_studies(&StudyQuery::default())
        .await
        .unwrap();
    assert_eq!(left_behind.len(), 1);
    assert_eq!(left_behind[0].status, StudyStatus::from("PENDING"));
    assert_eq!(harness.store.created_statuses(), vec!["PENDING"]);
    assert_eq!(harness.store.inner().result_count(), 0);

    let second = orchestrator.run(&request("alice"), None).await.unwrap();
    let study = match second {
        JobOutcome::Completed(study) => study,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert_eq!(study.status, StudyStatus::Success);
    assert_eq!(harness.service.submit_count(), 2);
    assert_eq!(harness.store.inner().result_count(), 3);
}

#[tokio::test]
async fn test_study_with_rejected_results_is_not_reused() {
    let unclosed = success(&[("NCBIGene:672(c.123A>G", "NCBIGene:7157", "0.5")]);
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![unclosed.clone(), unclosed, edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;
    let orchestrator = harness.orchestrator(fast_policy());

    let err = orchestrator.run(&request("alice"), None).await.unwrap_err();
    assert!(matches!(err, JobError::MalformedGeneToken(_)));
    let cached = harness
        .store
        .find_studies(&StudyQuery {
            status: Some(StudyStatus::Success),
            ..StudyQuery::default()
        })
        .await
        .unwrap();
    assert!(cached.is_empty());

    let second = orchestrator.run(&request("alice"), None).await.unwrap();
    assert!(matches!(second, JobOutcome::Completed(_)));
    assert_eq!(harness.service.submit_count(), 2);
}

#[tokio::test]
async fn test_failed_study_is_not_reused() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![
            failure("boom"),
            failure("boom"),
            edges(),
        ]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;
    let orchestrator = harness.orchestrator(fast_policy());

    let first = orchestrator.run(&request("alice"), None).await.unwrap();
    assert!(matches!(first, JobOutcome::Failed(_)));

    let second = orchestrator.run(&request("alice"), None).await.unwrap();
    assert!(matches!(second, JobOutcome::Completed(_)));
    assert_eq!(harness.service.submit_count(), 2);
}

#[tokio::test]
async fn test_different_hyperparameters_are_not_reused() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![edges()]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;
    let orchestrator = harness.orchestrator(fast_policy());

    orchestrator.run(&request("alice"), None).await.unwrap();
    let tuned = JobRequest::new(
        ALGORITHM,
        ZENODO_ID,
        Hyperparameters::from_value(json!({"max_depth": 4})).unwrap(),
        "alice",
    );
    let outcome = orchestrator.run(&tuned, None).await.unwrap();

    assert!(matches!(outcome, JobOutcome::Completed(_)));
    assert_eq!(harness.store.inner().algorithm_instance_count(), 2);
    let submissions = harness.service.submissions();
    assert_eq!(submissions[0].1.hyperparameters, Hyperparameters::Absent);
    assert_eq!(
        submissions[1].1.hyperparameters.to_value(),
        json!({"max_depth": 4})
    );
}

#[tokio::test]
async fn test_empty_result_table_succeeds_without_normalization() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![success(&[])]),
        StaticNormalizer::new(normalization_payload()),
    )
    .await;

    let study = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap()
        .into_study();

    assert_eq!(study.status, StudyStatus::Success);
    assert_eq!(study.stats.max, None);
    assert_eq!(study.stats.std_dev, None);
    assert!(harness.normalizer.calls().is_empty());
    assert_eq!(harness.store.inner().result_count(), 0);
}

#[tokio::test]
async fn test_normalizer_outage_fails_the_attempt() {
    let harness = Harness::new(
        ScriptedAlgorithmService::new(vec![status("STARTED"), edges()]),
        StaticNormalizer::failing(),
    )
    .await;

    let err = harness
        .orchestrator(fast_policy())
        .run(&request("alice"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Remote(_)));
    assert_eq!(harness.store.inner().result_count(), 0);
    assert_eq!(harness.store.saved_statuses(), Vec::<String>::new());
}
