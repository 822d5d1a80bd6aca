#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use np_api::{ApiConfig, ApiState, router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

/// Test state builder over a fresh, migrated in-memory database
pub struct TestStateBuilder {
    config: ApiConfig,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            config: ApiConfig {
                // Keep quiz order deterministic
                shuffle_questions: false,
                ..ApiConfig::default()
            },
        }
    }

    pub fn default_question_count(mut self, count: usize) -> Self {
        self.config.default_question_count = count;
        self
    }

    pub fn passing_score(mut self, score: u32) -> Self {
        self.config.passing_score = score;
        self
    }

    pub async fn build(self) -> ApiState {
        let pool = np_db::in_memory_pool()
            .await
            .expect("Failed to create test database");
        ApiState::new(self.config, pool)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Client over the full router with default test state
    pub async fn with_default_state() -> Self {
        Self::with_state(TestStateBuilder::new().build().await)
    }

    /// Client over the full router with the given state
    pub fn with_state(state: ApiState) -> Self {
        Self::new(router::router().with_state(state))
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Create a study area and return its id
    pub async fn create_area(&self, name: &str) -> Uuid {
        let response = self
            .post_json(
                "/api/study-areas",
                &json!({ "name": name, "description": format!("{name} review") }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let body: Value = response.json();
        body["area"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("created area has an id")
    }

    /// Create a question whose first option is correct
    pub async fn create_question(
        &self,
        area_id: Uuid,
        difficulty: &str,
        category: Option<&str>,
    ) -> CreatedQuestion {
        let response = self
            .post_json(
                "/api/questions",
                &json!({
                    "question_text": format!("A {difficulty} question"),
                    "options": ["right", "wrong", "also wrong", "still wrong"],
                    "correct_answer_index": 0,
                    "explanation": "The first option is right",
                    "difficulty": difficulty,
                    "area_id": area_id,
                    "category": category,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let body: Value = response.json();
        let question = &body["question"];
        let id = |v: &Value| v.as_str().and_then(|s| s.parse().ok()).expect("uuid");

        CreatedQuestion {
            id: id(&question["id"]),
            correct_option: id(&question["correct_answer_id"]),
            wrong_option: id(&question["options"][1]["id"]),
        }
    }

    /// Create a flashcard set and return its id
    pub async fn create_set(&self, name: &str) -> Uuid {
        self.create_set_with(name, true).await
    }

    /// Create a flashcard set with spaced repetition on or off
    pub async fn create_set_with(&self, name: &str, spaced_repetition: bool) -> Uuid {
        let response = self
            .post_json(
                "/api/flashcard-sets",
                &json!({
                    "name": name,
                    "description": format!("{name} terms"),
                    "category": "medical_terminology",
                    "spaced_repetition_enabled": spaced_repetition,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let body: Value = response.json();
        body["flashcard_set"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("created set has an id")
    }

    /// Review a card outside any session
    pub async fn review(&self, card_id: Uuid, quality: i64) -> TestResponse {
        self.post_json(
            &format!("/api/flashcards/{card_id}/review"),
            &json!({ "quality": quality, "response_time": 3.0 }),
        )
        .await
    }

    /// Create a flashcard and return its id
    pub async fn create_flashcard(&self, set_id: Uuid, term: &str) -> Uuid {
        let response = self
            .post_json(
                "/api/flashcards",
                &json!({
                    "set_id": set_id,
                    "term": term,
                    "definition": format!("meaning of {term}"),
                    "word_type": "term",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        let body: Value = response.json();
        body["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("created flashcard has an id")
    }
}

/// Ids of a question created through the API
#[derive(Debug, Clone, Copy)]
pub struct CreatedQuestion {
    pub id: Uuid,
    pub correct_option: Uuid,
    pub wrong_option: Uuid,
}

/// Response wrapper for easier testing
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// The `error` code of an error response
    pub fn error_code(&self) -> String {
        let body: Value = self.json();
        body["error"].as_str().unwrap_or_default().to_string()
    }
}
