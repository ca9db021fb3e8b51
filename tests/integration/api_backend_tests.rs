//! The `api` backend against a mock OpenAI-compatible endpoint.

use httpmock::prelude::*;
use serde_json::{Value, json};

use termalign::AlignError;
use termalign::config::{EmbeddingConfig, MatcherConfig};
use termalign::embedding::build_embedder;
use termalign::matcher::{DomainFilter, SemanticMatcher};
use termalign::test_utils::fixtures::lease_corpus;

fn vector_for(text: &str) -> Vec<f32> {
    match text {
        "ground lease" => vec![1.0, 0.0, 0.0],
        "site lease" => vec![0.9, 0.3, 0.0],
        "employee handbook" => vec![0.0, 0.0, 1.0],
        _ => vec![0.0, 1.0, 0.0],
    }
}

fn response_for(inputs: &[&str]) -> Value {
    let data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .map(|(index, text)| json!({"index": index, "embedding": vector_for(text)}))
        .collect();
    json!({"data": data, "model": "test-embed"})
}

fn api_config(server: &MockServer) -> EmbeddingConfig {
    EmbeddingConfig {
        backend: "api".to_string(),
        dims: 3,
        model: Some("test-embed".to_string()),
        base_url: Some(server.base_url()),
        api_key_env: None,
        timeout_ms: 5_000,
    }
}

#[test]
fn api_backend_drives_a_full_session() {
    let server = MockServer::start();
    let startup_check = server.mock(|when, then| {
        when.method(POST)
            .path("/embeddings")
            .json_body(json!({"model": "test-embed", "input": ["termalign startup check"]}));
        then.status(200).json_body(response_for(&["termalign startup check"]));
    });
    let corpus = server.mock(|when, then| {
        when.method(POST).path("/embeddings").json_body(json!({
            "model": "test-embed",
            "input": ["ground lease", "site lease", "employee handbook"]
        }));
        then.status(200)
            .json_body(response_for(&["ground lease", "site lease", "employee handbook"]));
    });
    let query = server.mock(|when, then| {
        when.method(POST)
            .path("/embeddings")
            .json_body(json!({"model": "test-embed", "input": ["ground lease"]}));
        then.status(200).json_body(response_for(&["ground lease"]));
    });

    let embedder = build_embedder(&api_config(&server)).unwrap();
    assert_eq!(embedder.name(), "api");

    let matcher = SemanticMatcher::new(embedder, MatcherConfig::default());
    matcher.load_corpus(lease_corpus()).unwrap();
    let results = matcher
        .search("ground lease", &DomainFilter::All, 3, 0.0)
        .unwrap();

    startup_check.assert();
    corpus.assert();
    query.assert();
    assert_eq!(results[0].text(), "ground lease");
    assert_eq!(results[1].text(), "site lease");
}

#[test]
fn unreachable_endpoint_is_model_unavailable() {
    let config = EmbeddingConfig {
        backend: "api".to_string(),
        dims: 3,
        base_url: Some("http://127.0.0.1:9".to_string()),
        timeout_ms: 2_000,
        ..EmbeddingConfig::default()
    };
    assert!(matches!(
        build_embedder(&config),
        Err(AlignError::ModelUnavailable(_))
    ));
}

#[test]
fn slow_query_embedding_surfaces_as_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/embeddings")
            .json_body(json!({"model": "test-embed", "input": ["termalign startup check"]}));
        then.status(200).json_body(response_for(&["termalign startup check"]));
    });
    server.mock(|when, then| {
        when.method(POST).path("/embeddings").json_body(json!({
            "model": "test-embed",
            "input": ["ground lease", "site lease", "employee handbook"]
        }));
        then.status(200)
            .json_body(response_for(&["ground lease", "site lease", "employee handbook"]));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/embeddings")
            .json_body(json!({"model": "test-embed", "input": ["slow query"]}));
        then.status(200)
            .delay(std::time::Duration::from_millis(1_500))
            .json_body(response_for(&["slow query"]));
    });

    let config = EmbeddingConfig {
        timeout_ms: 300,
        ..api_config(&server)
    };
    let matcher = SemanticMatcher::new(build_embedder(&config).unwrap(), MatcherConfig::default());
    matcher.load_corpus(lease_corpus()).unwrap();

    let err = matcher
        .search("slow query", &DomainFilter::All, 3, 0.0)
        .unwrap_err();
    assert!(matches!(err, AlignError::ProviderTimeout { .. }), "{err:?}");
}
