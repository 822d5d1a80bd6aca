use std::collections::{BTreeMap, HashMap};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use chrono::{DateTime, Utc};
use np_db::{
    models::{AttemptFilter, QuestionFilter, QuizAttempt},
    repositories::{area, competency, question, quiz},
};
use np_srs::{CompetencyRecord, RECENT_SCORE_WINDOW};
use rand::seq::SliceRandom;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::model::{
    CategoryPerformance, QuestionResult, QuizAnswer, QuizQuestion, QuizResult, QuizStarted,
    StartQuizRequest,
};
use crate::{ApiState, error::ApiError, metrics, validation};

/// Create the quiz routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/quiz/start", post(start_quiz))
        .route("/api/quiz/{quiz_id}/submit", post(submit_quiz))
}

/// Scores of the most recent completed quizzes, oldest first
pub(crate) async fn recent_scores(
    pool: &SqlitePool,
    area_id: Uuid,
    category: Option<&str>,
) -> Result<Vec<f64>, ApiError> {
    let attempts = quiz::completed_attempts(
        pool,
        &AttemptFilter {
            area_id: Some(area_id),
            category: category.map(str::to_string),
            limit: Some(RECENT_SCORE_WINDOW),
        },
    )
    .await?;

    Ok(attempts.iter().rev().map(|a| f64::from(a.score)).collect())
}

async fn start_quiz(
    State(state): State<ApiState>,
    Json(payload): Json<StartQuizRequest>,
) -> Result<(StatusCode, Json<QuizStarted>), ApiError> {
    validation::validate_payload(&payload)?;
    let count = validation::question_count(
        payload.question_count,
        state.config.default_question_count,
        state.config.max_question_count,
    )?;

    if area::get_area(&state.pool, payload.area_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("study area {}", payload.area_id)));
    }

    let category = payload.category.as_deref();
    let competency =
        np_srs::estimate_competency(&recent_scores(&state.pool, payload.area_id, category).await?);
    let difficulty_mix = *state.weights.mix_for(competency)?;

    // The selector draws from the area's questions, narrowed to the category
    let candidates = question::find_questions(
        &state.pool,
        &QuestionFilter {
            area_id: Some(payload.area_id),
            category: payload.category.clone(),
            ..Default::default()
        },
    )
    .await?;
    let mut questions = np_srs::select_questions(
        candidates.as_slice(),
        payload.area_id,
        competency,
        count,
        &state.weights,
    )?;

    metrics::record_selection(questions.iter().map(|q| q.difficulty));
    if state.config.shuffle_questions {
        questions.shuffle(&mut rand::thread_rng());
    }

    let attempt = QuizAttempt {
        id: Uuid::new_v4(),
        area_id: payload.area_id,
        category: payload.category.clone(),
        questions: questions.iter().map(|q| q.id).collect(),
        answers: HashMap::new(),
        score: 0,
        total_questions: questions.len() as u32,
        competency,
        started_at: Utc::now(),
        completed_at: None,
    };
    quiz::insert_attempt(&state.pool, &attempt).await?;

    tracing::info!(
        quiz_id = %attempt.id,
        area_id = %attempt.area_id,
        competency,
        questions = questions.len(),
        "Quiz started"
    );

    let questions: Vec<QuizQuestion> = questions
        .into_iter()
        .map(|q| QuizQuestion {
            id: q.id,
            question_text: q.question_text,
            options: q.options,
            difficulty: q.difficulty,
            category: q.category,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(QuizStarted {
            quiz_id: attempt.id,
            total_questions: questions.len(),
            questions,
            competency,
            difficulty_mix,
        }),
    ))
}

async fn submit_quiz(
    State(state): State<ApiState>,
    Path(quiz_id): Path<Uuid>,
    Json(answers): Json<Vec<QuizAnswer>>,
) -> Result<Json<QuizResult>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let attempt = quiz::get_attempt(&mut *tx, quiz_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("quiz {quiz_id}")))?;

    if attempt.is_completed() {
        return Err(ApiError::Validation(format!(
            "Quiz {quiz_id} has already been submitted"
        )));
    }

    // Later answers to the same question win
    let answer_map: HashMap<Uuid, Uuid> = answers
        .into_iter()
        .filter(|a| attempt.questions.contains(&a.question_id))
        .map(|a| (a.question_id, a.selected_option_id))
        .collect();

    let mut results = Vec::with_capacity(attempt.questions.len());
    let mut category_performance: BTreeMap<String, CategoryPerformance> = BTreeMap::new();

    for &question_id in &attempt.questions {
        let Some(question) = question::get_question(&mut *tx, question_id).await? else {
            tracing::warn!(%quiz_id, %question_id, "Quiz question no longer exists");
            continue;
        };

        let selected = answer_map.get(&question.id).copied();
        let is_correct = selected == Some(question.correct_answer_id);

        if let Some(category) = &question.category {
            category_performance
                .entry(category.clone())
                .or_default()
                .add(is_correct);
        }

        results.push(QuestionResult {
            question_id: question.id,
            selected_option: selected
                .and_then(|id| question.option_text(id))
                .map(str::to_string),
            correct_option: question
                .option_text(question.correct_answer_id)
                .map(str::to_string),
            question_text: question.question_text,
            is_correct,
            explanation: question.explanation,
        });
    }

    let total = results.len() as u32;
    let correct = results.iter().filter(|r| r.is_correct).count() as u32;
    let score = if total == 0 { 0 } else { correct * 100 / total };
    let now = Utc::now();

    let stored = quiz::complete_attempt(
        &mut *tx,
        &QuizAttempt {
            answers: answer_map,
            score,
            completed_at: Some(now),
            ..attempt.clone()
        },
    )
    .await?;
    if !stored {
        return Err(ApiError::Validation(format!(
            "Quiz {quiz_id} has already been submitted"
        )));
    }

    let mut records = Vec::with_capacity(category_performance.len() + 1);
    records.push(record_outcome(&mut tx, attempt.area_id, None, correct, total, now).await?);
    for (category, performance) in &category_performance {
        records.push(
            record_outcome(
                &mut tx,
                attempt.area_id,
                Some(category.as_str()),
                performance.correct,
                performance.total,
                now,
            )
            .await?,
        );
    }

    tx.commit().await?;

    let passing_score = state.config.passing_score;
    let passed = score >= passing_score;

    metrics::record_quiz_submission(score);
    tracing::info!(%quiz_id, score, correct, total, passed, "Quiz submitted");

    Ok(Json(QuizResult {
        score,
        correct_answers: correct,
        total_questions: total,
        passed,
        passing_score,
        results,
        category_performance,
        competency: records,
    }))
}

/// Fold a quiz outcome into the cumulative record for (area, category)
async fn record_outcome(
    conn: &mut SqliteConnection,
    area_id: Uuid,
    category: Option<&str>,
    correct: u32,
    total: u32,
    now: DateTime<Utc>,
) -> Result<CompetencyRecord, ApiError> {
    let mut record = competency::get_or_create_competency(&mut *conn, area_id, category, now).await?;
    record.record(correct, total, now);
    competency::upsert_competency(&mut *conn, &record).await?;
    Ok(record)
}
