//! In-process API tests for compilation and artifact lookup.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};

const GENERIC_FAILURE: &str =
    "LaTeX compilation failed. Please check your syntax or install LaTeX on the server.";

fn compile_body(identifier: &str) -> serde_json::Value {
    json!({
        "identifier": identifier,
        "source": fixtures::minimal_document(),
    })
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_exposes_compiler_settings() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["compiler"]["local"]["pass_timeout_secs"], 30);
    assert_eq!(response.body["compiler"]["remote"]["timeout_secs"], 60);
    assert_eq!(response.body["compiler"]["remote"]["command"], "pdflatex");
}

#[tokio::test]
async fn test_compile_returns_inline_pdf_from_local() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post_raw("/api/v1/compile", compile_body("42"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/pdf"));
    assert_eq!(
        response.header("content-disposition"),
        Some("inline; filename=\"compiled.pdf\"")
    );
    assert_eq!(response.header("x-compiled-by"), Some("local"));
    assert_eq!(response.bytes, fixtures::fake_pdf());
    assert_eq!(fixture.remote.call_count().await, 0);
}

#[tokio::test]
async fn test_compile_falls_back_to_remote() {
    let fixture = TestFixture::new().await;
    fixture.local.fail_with("pdflatex not installed").await;

    let response = fixture
        .post_raw("/api/v1/compile", compile_body("43"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("x-compiled-by"), Some("remote"));
    assert!(response.bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_compile_total_failure_hides_causes() {
    let fixture = TestFixture::new().await;
    fixture.local.fail_with("secret local detail").await;
    fixture.remote.fail_with("secret remote detail").await;

    let response = fixture.post("/api/v1/compile", compile_body("44")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], GENERIC_FAILURE);
    let text = response.body.to_string();
    assert!(!text.contains("secret"));
}

#[tokio::test]
async fn test_compile_rejects_empty_fields() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/compile",
            json!({ "identifier": "", "source": fixtures::minimal_document() }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("identifier"));

    let response = fixture
        .post("/api/v1/compile", json!({ "identifier": "45" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("source"));

    assert_eq!(fixture.local.call_count().await, 0);
}

#[tokio::test]
async fn test_successful_compile_is_recorded_as_artifact() {
    let fixture = TestFixture::new().await;
    fixture.local.fail_with("missing").await;

    let response = fixture
        .post_raw("/api/v1/compile", compile_body("intro-post"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(fixture.wait_for_artifacts(1).await);

    let artifact = fixture.get("/api/v1/artifacts/intro-post").await;
    assert_eq!(artifact.status, StatusCode::OK);
    assert_eq!(artifact.body["reference"], "compiled-intro-post.pdf");
    assert_eq!(artifact.body["strategy"], "remote");
    assert_eq!(
        artifact.body["size_bytes"],
        fixtures::fake_pdf().len() as u64
    );
}

#[tokio::test]
async fn test_failed_compile_is_not_recorded() {
    let fixture = TestFixture::new().await;
    fixture.local.fail_with("boom").await;
    fixture.remote.fail_with("boom").await;

    fixture.post("/api/v1/compile", compile_body("46")).await;

    let response = fixture.get("/api/v1/artifacts/46").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"].as_str().unwrap().contains("46"));
}

#[tokio::test]
async fn test_list_artifacts_with_pagination() {
    let fixture = TestFixture::new().await;
    for id in ["a", "b", "c"] {
        let response = fixture.post_raw("/api/v1/compile", compile_body(id)).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert!(fixture.wait_for_artifacts(3).await);

    let response = fixture.get("/api/v1/artifacts?limit=2").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 3);
    assert_eq!(response.body["limit"], 2);
    assert_eq!(response.body["artifacts"].as_array().unwrap().len(), 2);

    let response = fixture.get("/api/v1/artifacts?limit=5000&offset=2").await;
    assert_eq!(response.body["limit"], 1000);
    assert_eq!(response.body["offset"], 2);
    assert_eq!(response.body["artifacts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_compiler_status_lists_strategies() {
    let fixture = TestFixture::new().await;
    fixture.local.set_available(false).await;

    let response = fixture.get("/api/v1/compiler/status").await;
    assert_eq!(response.status, StatusCode::OK);

    let strategies = response.body["strategies"].as_array().unwrap();
    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[0]["strategy"], "local");
    assert_eq!(strategies[0]["available"], false);
    assert_eq!(strategies[1]["strategy"], "remote");
    assert_eq!(strategies[1]["available"], true);
}

#[tokio::test]
async fn test_concurrent_compiles_do_not_serialize() {
    let fixture = TestFixture::new().await;
    fixture
        .local
        .set_delay(std::time::Duration::from_millis(200))
        .await;

    let start = std::time::Instant::now();
    let requests = (0..5).map(|i| fixture.post_raw("/api/v1/compile", compile_body(&i.to_string())));
    let responses = futures::future::join_all(requests).await;

    assert!(responses.iter().all(|r| r.status == StatusCode::OK));
    assert!(start.elapsed() < std::time::Duration::from_millis(900));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.post_raw("/api/v1/compile", compile_body("m")).await;

    let response = fixture.get_raw("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.bytes).unwrap();
    assert!(text.contains("quali_compilations_total"));
    assert!(text.contains("quali_http_requests_total"));
}
