use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::TestClient;

#[tokio::test]
async fn test_health() {
    let client = TestClient::with_default_state().await;
    assert_eq!(client.get("/health").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let client = TestClient::with_default_state().await;
    assert_eq!(client.get("/api/nope").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_area_defaults_color() {
    let client = TestClient::with_default_state().await;

    let response = client
        .post_json(
            "/api/study-areas",
            &json!({ "name": "Pharmacology", "description": "Drug classes" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["area"]["name"], "Pharmacology");
    assert_eq!(body["area"]["color"], "#3B82F6");
}

#[tokio::test]
async fn test_create_area_rejects_bad_color() {
    let client = TestClient::with_default_state().await;

    let response = client
        .post_json(
            "/api/study-areas",
            &json!({ "name": "Cardiology", "description": "", "color": "red" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_error");
}

#[tokio::test]
async fn test_list_areas_counts_questions() {
    let client = TestClient::with_default_state().await;
    let pharm = client.create_area("Pharmacology").await;
    let peds = client.create_area("Pediatrics").await;

    client.create_question(pharm, "easy", None).await;
    client.create_question(pharm, "hard", None).await;

    let body: Value = client.get("/api/study-areas").await.json();
    let areas = body["study_areas"].as_array().expect("area list");
    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0]["id"], pharm.to_string());
    assert_eq!(areas[0]["question_count"], 2);
    assert_eq!(areas[1]["id"], peds.to_string());
    assert_eq!(areas[1]["question_count"], 0);
}

#[tokio::test]
async fn test_question_with_bad_answer_index_rejected() {
    let client = TestClient::with_default_state().await;
    let area = client.create_area("Fundamentals").await;

    let response = client
        .post_json(
            "/api/questions",
            &json!({
                "question_text": "Which is right?",
                "options": ["a", "b"],
                "correct_answer_index": 2,
                "area_id": area,
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_question_for_unknown_area_is_404() {
    let client = TestClient::with_default_state().await;

    let response = client
        .post_json(
            "/api/questions",
            &json!({
                "question_text": "Which is right?",
                "options": ["a", "b"],
                "correct_answer_index": 0,
                "area_id": Uuid::new_v4(),
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "not_found");
}

#[tokio::test]
async fn test_list_area_questions_respects_limit() {
    let client = TestClient::with_default_state().await;
    let area = client.create_area("Med-Surg").await;
    for _ in 0..4 {
        client.create_question(area, "medium", None).await;
    }

    let body: Value = client
        .get(&format!("/api/study-areas/{area}/questions?limit=3"))
        .await
        .json();
    assert_eq!(body["questions"].as_array().map(Vec::len), Some(3));

    let missing = client
        .get(&format!("/api/study-areas/{}/questions", Uuid::new_v4()))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
