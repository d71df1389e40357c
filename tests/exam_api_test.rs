use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

/// Drives the real router end to end. Upstream model endpoints are pointed
/// at an unroutable local port, so the generation and marking paths exercise
/// the generic-failure collapse without touching the network.
#[tokio::test]
async fn exam_api_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("OPENAI_BASE_URL", "http://127.0.0.1:9/v1");
    env::set_var("IMAGE_SERVICE_URL", "http://127.0.0.1:9/prompt");
    env::set_var("AI_TIMEOUT_SECS", "2");
    env::set_var("IMAGE_TIMEOUT_SECS", "1");
    env::set_var("PUBLIC_RPS", "100");

    mockexam_backend::config::init_config().expect("init config");
    let state = mockexam_backend::AppState::new();
    let app = mockexam_backend::app(state, 100);

    // Health check.
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");

    // Unknown paper type is rejected at deserialization, never defaulted.
    let req = Request::builder()
        .method("POST")
        .uri("/generate-exam")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "type": "PAPER_3" }).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // With the model unreachable, generation collapses to the one generic
    // failure.
    let req = Request::builder()
        .method("POST")
        .uri("/generate-exam")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "type": "PAPER_1" }).to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Failed to generate exam");

    // A paper without questions is a caller contract violation.
    let req = Request::builder()
        .method("POST")
        .uri("/mark-exam")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "paper": {
                    "id": "p1",
                    "paperType": "PAPER_1",
                    "title": "Empty",
                    "description": "",
                    "timeLimitMinutes": 105,
                    "sources": [],
                    "questions": []
                },
                "answers": {}
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A well-formed marking request against the unreachable model collapses
    // to the one generic marking failure.
    let req = Request::builder()
        .method("POST")
        .uri("/mark-exam")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "paper": {
                    "id": "p1",
                    "paperType": "PAPER_1",
                    "title": "Mock",
                    "description": "",
                    "timeLimitMinutes": 105,
                    "sources": [{
                        "id": "A", "title": "The Lamplighter", "author": "E. Hale",
                        "year": "1867", "content": "The fog rolled in.", "summary": "Fog."
                    }],
                    "questions": [{
                        "id": "q1", "number": 1,
                        "text": "List four things about the fog.",
                        "marks": 4, "assessmentObjectives": ["AO1"],
                        "section": "A", "sourceRef": "A", "type": "short"
                    }]
                },
                "answers": {
                    "q1": { "questionId": "q1", "text": "It was thick." }
                }
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Failed to mark exam");

    // Same contract check on the model-answers surface.
    let req = Request::builder()
        .method("POST")
        .uri("/model-answers")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "paper": {
                    "id": "p1",
                    "paperType": "PAPER_2",
                    "title": "Empty",
                    "description": "",
                    "timeLimitMinutes": 125,
                    "sources": [],
                    "questions": []
                }
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
