use gennifer::application::reconcile::{normalized_gene, NOT_FOUND_LABEL};
use gennifer::remote::{HttpNodeNormalizer, NodeNormalizer, RemoteError};
use mockito::{Matcher, Server};
use serde_json::json;

fn normalizer(url: String) -> HttpNodeNormalizer {
    HttpNodeNormalizer::new(url, reqwest::Client::new())
}

#[tokio::test]
async fn test_normalize_posts_curies_in_one_batch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/1.4/get_normalized_nodes")
        .match_body(Matcher::Json(json!({
            "curies": ["NCBIGene:672", "NCBIGene:7157", "NCBIGene:999999"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "NCBIGene:672": {
                    "id": {"identifier": "NCBIGene:672", "label": "BRCA1"},
                    "equivalent_identifiers": [
                        {"identifier": "NCBIGene:672", "label": "BRCA1"},
                        {"identifier": "ENSEMBL:ENSG00000012048"}
                    ],
                    "type": ["biolink:Gene"]
                },
                "NCBIGene:7157": {
                    "id": {"identifier": "NCBIGene:7157", "label": "TP53"},
                    "equivalent_identifiers": [{"identifier": "UniProtKB:P04637"}]
                },
                "NCBIGene:999999": null
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let curies = vec![
        "NCBIGene:672".to_string(),
        "NCBIGene:7157".to_string(),
        "NCBIGene:999999".to_string(),
    ];
    let response = normalizer(format!("{}/1.4", server.url()))
        .normalize(&curies)
        .await
        .unwrap();

    assert_eq!(response.len(), 3);
    let brca1 = normalized_gene(&response, "NCBIGene:672");
    assert_eq!(brca1.name, "BRCA1");
    assert_eq!(
        brca1.preferred_curie.as_deref(),
        Some("ENSEMBL:ENSG00000012048")
    );
    let tp53 = normalized_gene(&response, "NCBIGene:7157");
    assert_eq!(tp53.name, "TP53");
    assert_eq!(tp53.preferred_curie, None);
    let missing = normalized_gene(&response, "NCBIGene:999999");
    assert_eq!(missing.name, NOT_FOUND_LABEL);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_tolerated() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/get_normalized_nodes")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = normalizer(format!("{}/", server.url()));
    let response = client
        .normalize(&["HGNC:5".to_string()])
        .await
        .unwrap();

    assert!(response.is_empty());
    assert!(client.base_url().ends_with('/'));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_normalizer_outage_is_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/get_normalized_nodes")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = normalizer(server.url())
        .normalize(&["NCBIGene:1".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Api { status: 502, .. }));
}

#[tokio::test]
async fn test_non_object_body_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/get_normalized_nodes")
        .with_status(200)
        .with_body(r#"["NCBIGene:1"]"#)
        .create_async()
        .await;

    let err = normalizer(server.url())
        .normalize(&["NCBIGene:1".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Decode(_)));
}
