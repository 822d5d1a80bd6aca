use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{CreatedQuestion, TestClient, TestStateBuilder};

/// An area with `per_tier` questions of each difficulty
async fn seeded_area(client: &TestClient, per_tier: usize) -> Uuid {
    let area = client.create_area("Pharmacology").await;
    for difficulty in ["easy", "medium", "hard"] {
        for _ in 0..per_tier {
            client.create_question(area, difficulty, None).await;
        }
    }
    area
}

fn difficulty_counts(started: &Value) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for q in started["questions"].as_array().expect("questions") {
        let difficulty = q["difficulty"].as_str().expect("difficulty").to_string();
        *counts.entry(difficulty).or_default() += 1;
    }
    counts
}

fn question_ids(started: &Value) -> Vec<Uuid> {
    started["questions"]
        .as_array()
        .expect("questions")
        .iter()
        .map(|q| q["id"].as_str().and_then(|id| id.parse().ok()).expect("uuid"))
        .collect()
}

#[tokio::test]
async fn test_first_quiz_uses_middle_band() {
    let client = TestClient::with_default_state().await;
    let area = seeded_area(&client, 10).await;

    let response = client
        .post_json("/api/quiz/start", &json!({ "area_id": area }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["competency"], 0.5);
    assert_eq!(body["total_questions"], 10);

    let counts = difficulty_counts(&body);
    assert_eq!(counts.get("easy"), Some(&2));
    assert_eq!(counts.get("medium"), Some(&6));
    assert_eq!(counts.get("hard"), Some(&2));

    // Answers never leak into a started quiz
    assert!(body["questions"][0].get("correct_answer_id").is_none());
}

#[tokio::test]
async fn test_quiz_adapts_to_low_scores() {
    let client = TestClient::with_default_state().await;
    let area = seeded_area(&client, 10).await;

    let first: Value = client
        .post_json("/api/quiz/start", &json!({ "area_id": area }))
        .await
        .json();
    let quiz_id = first["quiz_id"].as_str().expect("quiz id");

    // Nothing answered: score 0
    let result: Value = client
        .post_json(&format!("/api/quiz/{quiz_id}/submit"), &json!([]))
        .await
        .json();
    assert_eq!(result["score"], 0);
    assert_eq!(result["passed"], false);

    let second: Value = client
        .post_json("/api/quiz/start", &json!({ "area_id": area }))
        .await
        .json();
    assert_eq!(second["competency"], 0.0);

    let counts = difficulty_counts(&second);
    assert_eq!(counts.get("easy"), Some(&7));
    assert_eq!(counts.get("medium"), Some(&3));
    assert_eq!(counts.get("hard"), None);
}

#[tokio::test]
async fn test_submit_scores_and_updates_competency() {
    let client = TestClient::with_default_state().await;
    let area = client.create_area("Maternity").await;
    let mut questions = Vec::new();
    for category in ["physiological_integrity", "physiological_integrity", "safe_care"] {
        questions.push(client.create_question(area, "medium", Some(category)).await);
    }
    questions.push(client.create_question(area, "medium", None).await);
    let by_id: HashMap<Uuid, CreatedQuestion> = questions.iter().map(|q| (q.id, *q)).collect();

    let started: Value = client
        .post_json(
            "/api/quiz/start",
            &json!({ "area_id": area, "question_count": 4 }),
        )
        .await
        .json();
    let quiz_id = started["quiz_id"].as_str().expect("quiz id");

    // Right on everything except the safe_care question
    let answers: Vec<Value> = question_ids(&started)
        .into_iter()
        .map(|id| {
            let q = by_id[&id];
            let option = if id == questions[2].id {
                q.wrong_option
            } else {
                q.correct_option
            };
            json!({ "question_id": id, "selected_option_id": option })
        })
        .collect();

    let response = client
        .post_json(&format!("/api/quiz/{quiz_id}/submit"), &answers)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let result: Value = response.json();
    assert_eq!(result["score"], 75);
    assert_eq!(result["correct_answers"], 3);
    assert_eq!(result["total_questions"], 4);
    assert_eq!(result["passed"], true);
    assert_eq!(result["passing_score"], 70);

    let performance = &result["category_performance"];
    assert_eq!(
        performance["physiological_integrity"],
        json!({ "correct": 2, "total": 2, "percentage": 100 })
    );
    assert_eq!(
        performance["safe_care"],
        json!({ "correct": 0, "total": 1, "percentage": 0 })
    );
    // The uncategorised question only counts towards the overall score
    assert_eq!(performance.as_object().map(|m| m.len()), Some(2));

    let wrong = result["results"]
        .as_array()
        .expect("results")
        .iter()
        .find(|r| r["is_correct"] == false)
        .expect("one wrong answer");
    assert_eq!(wrong["selected_option"], "wrong");
    assert_eq!(wrong["correct_option"], "right");
    assert_eq!(wrong["explanation"], "The first option is right");

    let records = result["competency"].as_array().expect("records");
    let record = |category: Value| {
        records
            .iter()
            .find(|r| r["category"] == category)
            .expect("competency record")
    };
    assert_eq!(record(Value::Null)["question_count"], 4);
    assert_eq!(record(Value::Null)["competency"], 0.75);
    assert_eq!(record(json!("physiological_integrity"))["competency"], 1.0);
    assert_eq!(record(json!("safe_care"))["competency"], 0.0);
    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn test_quiz_cannot_be_submitted_twice() {
    let client = TestClient::with_default_state().await;
    let area = seeded_area(&client, 2).await;

    let started: Value = client
        .post_json("/api/quiz/start", &json!({ "area_id": area }))
        .await
        .json();
    let uri = format!("/api/quiz/{}/submit", started["quiz_id"].as_str().expect("quiz id"));

    assert_eq!(client.post_json(&uri, &json!([])).await.status, StatusCode::OK);
    let again = client.post_json(&uri, &json!([])).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.error_code(), "validation_error");
}

#[tokio::test]
async fn test_small_area_returns_every_question() {
    let client = TestClient::with_default_state().await;
    let area = seeded_area(&client, 1).await;

    let body: Value = client
        .post_json("/api/quiz/start", &json!({ "area_id": area }))
        .await
        .json();
    assert_eq!(body["total_questions"], 3);
}

#[tokio::test]
async fn test_start_errors() {
    let client = TestClient::with_default_state().await;

    let unknown = client
        .post_json("/api/quiz/start", &json!({ "area_id": Uuid::new_v4() }))
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error_code(), "not_found");

    let empty_area = client.create_area("Empty").await;
    let empty = client
        .post_json("/api/quiz/start", &json!({ "area_id": empty_area }))
        .await;
    assert_eq!(empty.status, StatusCode::NOT_FOUND);
    assert_eq!(empty.error_code(), "no_content");

    let zero = client
        .post_json(
            "/api/quiz/start",
            &json!({ "area_id": empty_area, "question_count": 0 }),
        )
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let missing_quiz = client
        .post_json(&format!("/api/quiz/{}/submit", Uuid::new_v4()), &json!([]))
        .await;
    assert_eq!(missing_quiz.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_passing_score_is_configurable() {
    let state = TestStateBuilder::new().passing_score(80).build().await;
    let client = TestClient::with_state(state);
    let area = client.create_area("Pediatrics").await;
    let mut questions = Vec::new();
    for _ in 0..4 {
        questions.push(client.create_question(area, "easy", Some("health_promotion")).await);
    }

    let started: Value = client
        .post_json(
            "/api/quiz/start",
            &json!({ "area_id": area, "question_count": 4 }),
        )
        .await
        .json();
    let quiz_id = started["quiz_id"].as_str().expect("quiz id");

    // Three of four right: 75, below the bar
    let answers: Vec<Value> = questions
        .iter()
        .take(3)
        .map(|q| json!({ "question_id": q.id, "selected_option_id": q.correct_option }))
        .collect();
    let result: Value = client
        .post_json(&format!("/api/quiz/{quiz_id}/submit"), &answers)
        .await
        .json();

    assert_eq!(result["score"], 75);
    assert_eq!(result["passed"], false);
    assert_eq!(result["passing_score"], 80);
    assert_eq!(result["category_performance"]["health_promotion"]["percentage"], 75);
}
