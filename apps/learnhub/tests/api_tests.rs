//! Integration tests for the Learnhub HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use learnhub::api::{AppState, ErrorResponse, HealthResponse, create_router};
use learnhub::config::ServerConfig;
use learnhub_core::{
    CodeImplementation, Concept, ConceptDetail, Experiment, MemStore, Paper, TheoryContent,
};
use serde_json::{Value, json};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Test server over the seed dataset with default configuration.
fn create_test_server() -> TestServer {
    let state = AppState::seeded().unwrap();
    TestServer::new(create_router(state, &ServerConfig::default())).unwrap()
}

/// Test server over an empty store.
fn create_empty_test_server() -> TestServer {
    let state = AppState::new(MemStore::new());
    TestServer::new(create_router(state, &ServerConfig::default())).unwrap()
}

fn valid_paper(title: &str) -> Value {
    json!({
        "title": title,
        "authors": "David Berthelot, Nicholas Carlini",
        "year": 2019,
        "conference": "NeurIPS",
        "concepts": ["semi-supervised-learning"]
    })
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_seed_counts() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.counts.concepts, 3);
    assert_eq!(health.counts.theory_content, 2);
    assert_eq!(health.counts.code_implementations, 2);
    assert_eq!(health.counts.experiments, 1);
    assert_eq!(health.counts.papers, 3);
}

// =============================================================================
// CONCEPT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_concepts() {
    let server = create_test_server();

    let response = server.get("/api/concepts").await;

    response.assert_status_ok();
    let concepts: Vec<Concept> = response.json();
    let slugs: Vec<_> = concepts.iter().map(|c| c.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "semi-supervised-learning",
            "self-supervised-learning",
            "contrastive-learning"
        ]
    );
}

#[tokio::test]
async fn test_list_concepts_empty_store() {
    let server = create_empty_test_server();

    let response = server.get("/api/concepts").await;

    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_concept_wire_format_is_camel_case() {
    let server = create_test_server();

    let response = server.get("/api/concepts").await;
    let concepts: Value = response.json();

    let first = &concepts[0];
    assert_eq!(first["id"], 1);
    assert!(first.get("updatedAt").is_some());
    assert!(first.get("updated_at").is_none());
}

#[tokio::test]
async fn test_category_filter_matches_full_list() {
    let server = create_test_server();

    let filtered: Vec<Concept> = server
        .get("/api/concepts/category/self-supervised")
        .await
        .json();
    let all: Vec<Concept> = server.get("/api/concepts").await.json();

    assert!(!filtered.is_empty());
    assert!(filtered.iter().all(|c| c.category == "self-supervised"));
    let expected: Vec<_> = all
        .into_iter()
        .filter(|c| c.category == "self-supervised")
        .collect();
    assert_eq!(filtered, expected);
}

#[tokio::test]
async fn test_unknown_category_is_empty_array() {
    let server = create_test_server();

    let response = server.get("/api/concepts/category/reinforcement").await;

    response.assert_status_ok();
    response.assert_json(&json!([]));
}

#[tokio::test]
async fn test_concept_detail_for_semi_supervised() {
    let server = create_test_server();

    let response = server.get("/api/concepts/semi-supervised-learning").await;

    response.assert_status_ok();
    let detail: ConceptDetail = response.json();
    assert_eq!(detail.concept.id.value(), 1);
    assert!(detail.theory.is_some());
    assert_eq!(detail.code_implementations.len(), 2);
    assert_eq!(detail.experiments.len(), 1);
}

#[tokio::test]
async fn test_concept_detail_shape() {
    let server = create_test_server();

    let detail: Value = server
        .get("/api/concepts/contrastive-learning")
        .await
        .json();

    assert!(detail["concept"].is_object());
    assert!(detail["theory"].is_null());
    assert_eq!(detail["codeImplementations"], json!([]));
    assert_eq!(detail["experiments"], json!([]));
}

#[tokio::test]
async fn test_unknown_concept_is_404_with_message() {
    let server = create_test_server();

    let response = server.get("/api/concepts/does-not-exist").await;

    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Concept not found");
    assert!(body.errors.is_none());
}

#[tokio::test]
async fn test_create_concept() {
    let server = create_test_server();

    let response = server
        .post("/api/concepts")
        .json(&json!({
            "slug": "mixmatch",
            "title": "MixMatch",
            "description": "Holistic semi-supervised learning",
            "category": "semi-supervised"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let concept: Concept = response.json();
    assert_eq!(concept.id.value(), 4);
    assert_eq!(concept.slug, "mixmatch");

    let detail: ConceptDetail = server.get("/api/concepts/mixmatch").await.json();
    assert_eq!(detail.concept, concept);
}

#[tokio::test]
async fn test_create_concept_duplicate_slug_is_conflict() {
    let server = create_test_server();

    let response = server
        .post("/api/concepts")
        .json(&json!({
            "slug": "contrastive-learning",
            "title": "Again",
            "category": "self-supervised"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: ErrorResponse = response.json();
    assert!(body.message.contains("contrastive-learning"));

    let all: Vec<Concept> = server.get("/api/concepts").await.json();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_create_concept_accepts_empty_title() {
    let server = create_test_server();

    let response = server
        .post("/api/concepts")
        .json(&json!({ "slug": "untitled", "title": "", "category": "semi-supervised" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let concept: Concept = response.json();
    assert_eq!(concept.title, "");
}

#[tokio::test]
async fn test_create_concept_rejects_empty_slug() {
    let server = create_test_server();

    let response = server
        .post("/api/concepts")
        .json(&json!({ "slug": "", "title": "T", "category": "c" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["code"], "too_small");
    assert_eq!(body["errors"][0]["path"], json!(["slug"]));
}

#[tokio::test]
async fn test_create_concept_invalid_slug() {
    let server = create_test_server();

    let response = server
        .post("/api/concepts")
        .json(&json!({ "slug": "has spaces", "title": "T", "category": "c" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid concept data");
    assert_eq!(body["errors"][0]["code"], "invalid_string");
    assert_eq!(body["errors"][0]["path"], json!(["slug"]));
}

// =============================================================================
// THEORY ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_theory_for_concept() {
    let server = create_test_server();

    let response = server.get("/api/theory/1").await;

    response.assert_status_ok();
    let theory: TheoryContent = response.json();
    assert_eq!(theory.concept_id.value(), 1);
    assert!(theory.content.contains("Semi-Supervised"));
}

#[tokio::test]
async fn test_theory_missing_is_404() {
    let server = create_test_server();

    let response = server.get("/api/theory/3").await;
    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Theory content not found");

    server.get("/api/theory/abc").await.assert_status_not_found();
}

#[tokio::test]
async fn test_create_theory() {
    let server = create_test_server();

    let response = server
        .post("/api/theory")
        .json(&json!({ "conceptId": 3, "content": "# Contrastive Learning\n\n$\\mathcal{L}$" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: TheoryContent = response.json();
    assert_eq!(created.id.value(), 3);

    let fetched: TheoryContent = server.get("/api/theory/3").await.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_theory_rejects_string_concept_id() {
    let server = create_test_server();

    let response = server
        .post("/api/theory")
        .json(&json!({ "conceptId": "3", "content": "x" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid theory content data");
    assert_eq!(body["errors"][0]["expected"], "integer");
    assert_eq!(body["errors"][0]["received"], "string");
}

// =============================================================================
// CODE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_code_for_concept() {
    let server = create_test_server();

    let code: Vec<CodeImplementation> = server.get("/api/code/1").await.json();
    let languages: Vec<_> = code.iter().map(|c| c.language.as_str()).collect();
    assert_eq!(languages, vec!["python", "cpp"]);

    server.get("/api/code/2").await.assert_json(&json!([]));
    server.get("/api/code/not-a-number").await.assert_json(&json!([]));
}

#[tokio::test]
async fn test_create_code_round_trip() {
    let server = create_test_server();
    let body = json!({
        "conceptId": 2,
        "title": "SimCLR Loss",
        "language": "python",
        "code": "def nt_xent(z1, z2, tau=0.5):\n    ...\n",
        "description": "NT-Xent loss"
    });

    let response = server.post("/api/code").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    let created: CodeImplementation = response.json();
    assert_eq!(created.id.value(), 3);

    let listed: Vec<CodeImplementation> = server.get("/api/code/2").await.json();
    assert_eq!(listed, vec![created]);

    let listed: Value = server.get("/api/code/2").await.json();
    let record = &listed[0];
    for key in ["conceptId", "title", "language", "code", "description"] {
        assert_eq!(record[key], body[key], "field {key} changed");
    }
    assert!(record["updatedAt"].is_string());
}

#[tokio::test]
async fn test_create_code_missing_fields_lists_each() {
    let server = create_test_server();

    let response = server
        .post("/api/code")
        .json(&json!({ "conceptId": 1 }))
        .await;

    response.assert_status_bad_request();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Invalid code implementation data");
    assert_eq!(body.errors.unwrap().len(), 3);
}

// =============================================================================
// EXPERIMENT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_experiments_for_concept() {
    let server = create_test_server();

    let experiments: Vec<Experiment> = server.get("/api/experiments/1").await.json();
    assert_eq!(experiments.len(), 1);
    let metrics = experiments[0].metrics.as_ref().unwrap();
    assert_eq!(metrics["epochs"].as_array().unwrap().len(), 11);

    server
        .get("/api/experiments/99")
        .await
        .assert_json(&json!([]));
}

#[tokio::test]
async fn test_create_experiment_keeps_free_form_json() {
    let server = create_test_server();
    let results = json!({ "accuracy": 91.5, "comparison": { "byol": 91.5 } });

    let response = server
        .post("/api/experiments")
        .json(&json!({
            "conceptId": 2,
            "title": "BYOL linear eval",
            "results": results,
            "metrics": { "epochs": [1, 2], "val_accuracy": [50, 60] }
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Experiment = response.json();
    assert_eq!(created.id.value(), 2);
    assert_eq!(created.results, Some(results));
    assert!(created.setup.is_none());
}

#[tokio::test]
async fn test_create_experiment_invalid_title_type() {
    let server = create_test_server();

    let response = server
        .post("/api/experiments")
        .json(&json!({ "conceptId": 1, "title": 42 }))
        .await;

    response.assert_status_bad_request();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Invalid experiment data");
}

// =============================================================================
// PAPER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_papers() {
    let server = create_test_server();

    let papers: Vec<Paper> = server.get("/api/papers").await.json();
    assert_eq!(papers.len(), 3);
    assert_eq!(papers[0].year, 2020);
}

#[tokio::test]
async fn test_paper_by_id_and_wire_format() {
    let server = create_test_server();

    let response = server.get("/api/papers/2").await;
    response.assert_status_ok();
    let paper: Value = response.json();
    assert_eq!(paper["id"], 2);
    assert!(paper["key_points"].is_string());
    assert!(paper["abstract"].is_string());
    assert!(paper.get("keyPoints").is_none());
}

#[tokio::test]
async fn test_paper_not_found() {
    let server = create_test_server();

    let response = server.get("/api/papers/999").await;
    response.assert_status_not_found();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Paper not found");

    server.get("/api/papers/abc").await.assert_status_not_found();
}

#[tokio::test]
async fn test_related_papers() {
    let server = create_test_server();

    let papers: Vec<Paper> = server
        .get("/api/papers/related")
        .add_query_param("concepts", "contrastive-learning,pseudo-labeling")
        .await
        .json();
    let ids: Vec<_> = papers.iter().map(|p| p.id.value()).collect();
    assert_eq!(ids, vec![1, 3]);

    server
        .get("/api/papers/related")
        .await
        .assert_json(&json!([]));
}

#[tokio::test]
async fn test_failed_paper_create_does_not_consume_id() {
    let server = create_test_server();

    let mut missing_title = valid_paper("unused");
    missing_title.as_object_mut().unwrap().remove("title");

    let response = server.post("/api/papers").json(&missing_title).await;
    response.assert_status_bad_request();
    let body: ErrorResponse = response.json();
    assert_eq!(body.message, "Invalid paper data");
    let errors = body.errors.unwrap();
    assert!(!errors.is_empty());
    assert_eq!(serde_json::to_value(&errors[0].path).unwrap(), json!(["title"]));

    let response = server.post("/api/papers").json(&valid_paper("MixMatch")).await;
    response.assert_status(StatusCode::CREATED);
    let paper: Paper = response.json();
    assert_eq!(paper.id.value(), 4);
}

#[tokio::test]
async fn test_create_paper_rejects_bad_types() {
    let server = create_test_server();

    let mut body = valid_paper("MixMatch");
    body["year"] = json!("2019");
    body["concepts"] = json!(["ok", 7]);

    let response = server.post("/api/papers").json(&body).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    let paths: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].clone())
        .collect();
    assert_eq!(paths, vec![json!(["year"]), json!(["concepts", 1])]);
}

#[tokio::test]
async fn test_created_ids_strictly_increase() {
    let server = create_test_server();

    let mut last = 3;
    for title in ["A", "B", "C"] {
        let paper: Paper = server
            .post("/api/papers")
            .json(&valid_paper(title))
            .await
            .json();
        assert!(paper.id.value() > last);
        last = paper.id.value();
    }
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let server = create_test_server();

    server.get("/unknown").await.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = create_test_server();

    let response = server.post("/health").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = create_test_server();

    let response = server
        .post("/api/papers")
        .bytes(bytes::Bytes::from("not valid json"))
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid paper data");
    assert_eq!(body["errors"][0]["code"], "invalid_json");
    assert_eq!(body["errors"][0]["path"], json!([]));
}

#[tokio::test]
async fn test_non_object_body() {
    let server = create_test_server();

    let response = server.post("/api/concepts").json(&json!([1, 2, 3])).await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["expected"], "object");
    assert_eq!(body["errors"][0]["received"], "array");
}

#[tokio::test]
async fn test_body_limit_is_enforced() {
    let config = ServerConfig {
        body_limit_bytes: 64,
        ..ServerConfig::default()
    };
    let state = AppState::seeded().unwrap();
    let server = TestServer::new(create_router(state, &config)).unwrap();

    let response = server
        .post("/api/theory")
        .json(&json!({ "conceptId": 3, "content": "x".repeat(1024) }))
        .await;

    assert!(response.status_code().is_client_error());
    let theory = server.get("/api/theory/3").await;
    theory.assert_status_not_found();
}

// =============================================================================
// CORS TESTS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_localhost_by_default() {
    let server = create_test_server();

    let response = server
        .get("/api/concepts")
        .add_header(
            header::ORIGIN,
            "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("allow-origin header must be present");
    assert_eq!(allowed, "http://localhost:5173");
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let config = ServerConfig {
        cors_origins: vec!["https://hub.example".to_string()],
        ..ServerConfig::default()
    };
    let state = AppState::seeded().unwrap();
    let server = TestServer::new(create_router(state, &config)).unwrap();

    let response = server
        .get("/api/concepts")
        .add_header(
            header::ORIGIN,
            "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

// =============================================================================
// ROUTER AS A TOWER SERVICE
// =============================================================================

#[tokio::test]
async fn test_router_serves_oneshot_requests() {
    use tower::ServiceExt;

    let router = create_router(AppState::seeded().unwrap(), &ServerConfig::default());
    let request = axum::http::Request::builder()
        .uri("/api/papers/1")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
