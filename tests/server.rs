//! End-to-end tests for the prediction service.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, either over a stub
//! predictor or over a pipeline trained from a small CSV fixture.

use std::{io::Write, sync::Arc};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use spam_classifier::{
    pipelines::text_classification::{Config, Pipeline, Predictor},
    server::{build_router, prepare_pipeline, AppState, ServeConfig},
};
use tempfile::NamedTempFile;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Always predicts the same class, and records nothing
struct StubPredictor(usize);

impl Predictor for StubPredictor {
    fn predict(&self, texts: &[String]) -> anyhow::Result<Vec<usize>> {
        Ok(vec![self.0; texts.len()])
    }
}

/// Always fails
struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn predict(&self, _texts: &[String]) -> anyhow::Result<Vec<usize>> {
        Err(anyhow::anyhow!("model unavailable"))
    }
}

fn write_fixture() -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(b"category,message_text\nham,\"Hello friend\"\nspam,\"WIN FREE CASH NOW\"\n")
        .unwrap();
    f
}

fn trained_app() -> Router {
    let f = write_fixture();
    let pipeline = Pipeline::from_csv(f.path(), Config::new()).unwrap();

    build_router(AppState::new(Arc::new(pipeline)))
}

fn predict_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(AppState::new(Arc::new(StubPredictor(0))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_predict_with_stub_predictor() {
    let app = build_router(AppState::new(Arc::new(StubPredictor(1))));

    let body = serde_json::to_vec(&json!({ "text": "anything" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "predictions": [1] }));
}

#[tokio::test]
async fn test_predict_spam_end_to_end() {
    let app = trained_app();

    let body = serde_json::to_vec(&json!({ "text": "WIN FREE CASH" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "predictions": [1] }));
}

#[tokio::test]
async fn test_predict_ham_end_to_end() {
    let app = trained_app();

    let body = serde_json::to_vec(&json!({ "text": "hello friend" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(json_body(response).await, json!({ "predictions": [0] }));
}

#[tokio::test]
async fn test_predict_empty_text_returns_one_label() {
    let app = trained_app();

    let body = serde_json::to_vec(&json!({ "text": "" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert!(predictions[0].as_u64().unwrap() <= 1);
}

#[tokio::test]
async fn test_predict_ignores_extra_fields() {
    let app = build_router(AppState::new(Arc::new(StubPredictor(0))));

    let body = serde_json::to_vec(&json!({ "text": "hi", "lang": "en" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_missing_text_is_rejected() {
    let app = build_router(AppState::new(Arc::new(StubPredictor(0))));

    let body = serde_json::to_vec(&json!({ "message": "hi" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_predict_invalid_json_is_rejected() {
    let app = build_router(AppState::new(Arc::new(StubPredictor(0))));

    let response = app.oneshot(predict_request("{not json")).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_predictor_failure_is_a_server_error() {
    let app = build_router(AppState::new(Arc::new(FailingPredictor)));

    let body = serde_json::to_vec(&json!({ "text": "hi" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "model unavailable");
}

#[tokio::test]
async fn test_prepare_pipeline_fails_on_missing_data() {
    let config = ServeConfig {
        data_path: "/nonexistent/spamorham.csv".into(),
        ..ServeConfig::default()
    };

    assert!(prepare_pipeline(&config).is_err());
}

#[tokio::test]
async fn test_prepare_pipeline_from_saved_artifact() {
    let f = write_fixture();
    let dir = tempfile::TempDir::new().unwrap();
    Pipeline::from_csv(f.path(), Config::new())
        .unwrap()
        .save(dir.path())
        .unwrap();

    let config = ServeConfig {
        artifact_dir: Some(dir.path().to_path_buf()),
        ..ServeConfig::default()
    };
    let app = build_router(AppState::new(Arc::new(prepare_pipeline(&config).unwrap())));

    let body = serde_json::to_vec(&json!({ "text": "WIN FREE CASH" })).unwrap();
    let response = app.oneshot(predict_request(body)).await.unwrap();

    assert_eq!(json_body(response).await, json!({ "predictions": [1] }));
}
