//! Integration tests for the Router service

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dxflow_domain::{AnalysisResult, AnalysisSource};
use dxflow_extractor::{AnalysisSession, Analyzer, AnalyzerConfig, InferenceConfig};
use dxflow_llm::MockProvider;
use dxflow_router::handlers::{create_router, AppState, ErrorResponse, HealthCheckResponse};
use std::time::Duration;
use tower::ServiceExt; // for oneshot

const VALID_REPLY: &str = r#"{
    "nodes": [
        {"id": "dx_0", "kind": "diagnosis", "label": "migraine", "category": "neurological",
         "likelihood": 0.7, "confidence": 0.8, "evidence": ["headache"]},
        {"id": "action_0", "kind": "next_action", "label": "neurological exam",
         "category": "diagnostic", "priority": "high", "timing": "within 1 hour",
         "diagnosisId": "dx_0"}
    ],
    "edges": [
        {"id": "edge_0", "source": "dx_0", "target": "action_0", "kind": "investigates",
         "label": "investigates", "strength": "strong"}
    ],
    "problemList": [
        {"id": "problem_0", "diagnosis": "migraine", "code": "G43.909", "likelihood": 0.7,
         "category": "acute", "evidence": ["headache"], "status": "active"}
    ]
}"#;

/// Helper to create test application state
fn create_test_state(provider: Option<MockProvider>) -> AppState<MockProvider> {
    let config = AnalyzerConfig {
        inference: InferenceConfig {
            retry_delay_ms: 10,
            ..InferenceConfig::default()
        },
        ..AnalyzerConfig::default()
    };
    AppState::new(AnalysisSession::new(Analyzer::new(provider, config)))
}

fn analyze_request(note: &str) -> Request<Body> {
    let body = serde_json::json!({ "note": note }).to_string();
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_health_check_without_provider() {
    let app = create_router(create_test_state(None));

    let (status, body) = send(&app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "degraded");
    assert!(!health.inference_enabled);
    assert!(health.model.is_none());
    assert_eq!(health.generation, 0);
}

#[tokio::test]
async fn test_health_check_with_provider() {
    let app = create_router(create_test_state(Some(MockProvider::new(VALID_REPLY))));

    let (_, body) = send(&app, get_request("/health")).await;
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.inference_enabled);
    assert_eq!(health.model.as_deref(), Some("mock"));
}

#[tokio::test]
async fn test_analyze_returns_camel_case_graph() {
    let app = create_router(create_test_state(None));

    let (status, body) = send(&app, analyze_request("45-year-old male with chest pain")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["problemList"].is_array());
    assert!(json["nodes"][0]["position"]["x"].is_number());

    let result: AnalysisResult = serde_json::from_value(json).unwrap();
    assert_eq!(result.metadata.source, AnalysisSource::Deterministic);
    assert_eq!(result.diagnoses().count(), 4);
    assert_eq!(result.actions().count(), 8);
}

#[tokio::test]
async fn test_analyze_uses_inference_reply() {
    let app = create_router(create_test_state(Some(MockProvider::new(VALID_REPLY))));

    let (status, body) = send(&app, analyze_request("severe headache")).await;
    assert_eq!(status, StatusCode::OK);

    let result: AnalysisResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.metadata.source, AnalysisSource::Inference);
    assert_eq!(result.nodes[0].label, "migraine");
}

#[tokio::test]
async fn test_analyze_falls_back_when_provider_fails() {
    let app = create_router(create_test_state(Some(MockProvider::failing())));

    let (status, body) = send(&app, analyze_request("fever")).await;
    assert_eq!(status, StatusCode::OK);

    let result: AnalysisResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(result.metadata.source, AnalysisSource::Deterministic);
    assert_eq!(result.metadata.inference_attempts, 2);
}

#[tokio::test]
async fn test_empty_note_is_unprocessable() {
    let app = create_router(create_test_state(None));

    let (status, body) = send(&app, analyze_request("  ")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_oversized_note_is_unprocessable() {
    let app = create_router(create_test_state(None));
    let note = "a".repeat(AnalyzerConfig::default().max_note_length + 1);

    let (status, _) = send(&app, analyze_request(&note)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_note_field_is_rejected() {
    let app = create_router(create_test_state(None));

    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"text": "fever"}"#))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_latest_analysis() {
    let app = create_router(create_test_state(None));

    let (status, _) = send(&app, get_request("/analysis/latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, analyze_request("fever")).await;
    let submitted: AnalysisResult = serde_json::from_slice(&body).unwrap();

    let (status, body) = send(&app, get_request("/analysis/latest")).await;
    assert_eq!(status, StatusCode::OK);
    let latest: AnalysisResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(latest.metadata.analysis_id, submitted.metadata.analysis_id);
}

#[tokio::test]
async fn test_rejected_note_keeps_previous_result() {
    let app = create_router(create_test_state(None));

    let (_, body) = send(&app, analyze_request("chest pain")).await;
    let first: AnalysisResult = serde_json::from_slice(&body).unwrap();

    let (status, _) = send(&app, analyze_request("")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, get_request("/analysis/latest")).await;
    let latest: AnalysisResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(latest.metadata.analysis_id, first.metadata.analysis_id);
}

#[tokio::test]
async fn test_newer_request_supersedes_in_flight_one() {
    let provider = MockProvider::new(VALID_REPLY).with_delay(Duration::from_millis(300));
    let app = create_router(create_test_state(Some(provider)));

    let first = send(&app, analyze_request("headache"));
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        send(&app, analyze_request("headache with aura")).await
    };
    let ((first_status, _), (second_status, body)) = tokio::join!(first, second);

    assert_eq!(first_status, StatusCode::CONFLICT);
    assert_eq!(second_status, StatusCode::OK);

    let second: AnalysisResult = serde_json::from_slice(&body).unwrap();
    let (_, body) = send(&app, get_request("/analysis/latest")).await;
    let latest: AnalysisResult = serde_json::from_slice(&body).unwrap();
    assert_eq!(latest.metadata.analysis_id, second.metadata.analysis_id);

    let (_, body) = send(&app, get_request("/health")).await;
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.generation, 2);
}
