use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use np_db::{
    models::{FlashcardFilter, StudySession},
    repositories::{flashcard, flashcard_set, study_session},
};
use np_srs::RecallState;
use uuid::Uuid;

use super::model::{
    FlashcardStats, SessionReviewOutcome, SessionReviewRequest, SessionStarted, SessionSummary,
    StartSessionRequest,
};
use crate::{
    ApiState,
    error::ApiError,
    flashcard::{
        model::{FlashcardView, ReviewSubmission},
        routes::review_card,
    },
};

/// Upper bound on the cards a session hands out
const MAX_SESSION_CARDS: usize = 200;

/// Create the study session and flashcard statistics routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/flashcards/study", post(start_session))
        .route("/api/flashcards/study/{session_id}/review", post(review_in_session))
        .route("/api/flashcards/study/{session_id}/complete", post(complete_session))
        .route("/api/flashcards/stats", get(flashcard_stats))
}

async fn start_session(
    State(state): State<ApiState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionStarted>), ApiError> {
    let max_cards = payload.max_cards.unwrap_or(state.config.session_card_limit);
    if max_cards == 0 || max_cards > MAX_SESSION_CARDS {
        return Err(ApiError::Validation(format!(
            "max_cards must be between 1 and {MAX_SESSION_CARDS}, got {max_cards}"
        )));
    }

    let set = flashcard_set::get_set(&state.pool, payload.set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard set {}", payload.set_id)))?;

    let cards = flashcard::find_flashcards(
        &state.pool,
        &FlashcardFilter {
            set_id: Some(set.id),
            ..Default::default()
        },
    )
    .await?;

    let now = Utc::now();
    let picked = if set.spaced_repetition_enabled {
        np_srs::select_due(&cards, now, max_cards)?
    } else {
        if cards.is_empty() {
            return Err(ApiError::EmptyPool(format!("no flashcards in set {}", set.id)));
        }
        cards.into_iter().take(max_cards).collect()
    };

    let session = StudySession::new(set.id, now);
    study_session::insert_session(&state.pool, &session).await?;

    tracing::info!(
        session_id = %session.id,
        set_id = %set.id,
        cards = picked.len(),
        "Study session started"
    );

    let flashcards: Vec<FlashcardView> = picked.into_iter().map(FlashcardView::from).collect();
    Ok((
        StatusCode::CREATED,
        Json(SessionStarted {
            session_id: session.id,
            set_id: set.id,
            spaced_repetition: set.spaced_repetition_enabled,
            count: flashcards.len(),
            flashcards,
        }),
    ))
}

async fn review_in_session(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SessionReviewRequest>,
) -> Result<Json<SessionReviewOutcome>, ApiError> {
    let review = ReviewSubmission {
        quality: payload.quality,
        response_time: payload.response_time,
    }
    .to_review()?;

    let mut tx = state.pool.begin().await?;

    let mut session = study_session::get_session(&mut *tx, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("study session {session_id}")))?;
    if session.is_completed() {
        return Err(ApiError::Validation(format!(
            "Study session {session_id} is already completed"
        )));
    }

    let card = flashcard::get_flashcard(&mut *tx, payload.card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {}", payload.card_id)))?;
    if card.set_id != session.set_id {
        return Err(ApiError::Validation(format!(
            "Flashcard {} is not part of the set being studied",
            card.id
        )));
    }

    let outcome = review_card(&mut tx, card.id, review).await?;
    session.record_review(card.id, review.quality.is_success());
    study_session::update_session(&mut *tx, &session).await?;

    tx.commit().await?;

    let recall = outcome.card.card.recall.clone().unwrap_or_default();
    Ok(Json(SessionReviewOutcome {
        session_id,
        next_review_in_days: recall.interval,
        success_rate: recall.success_rate,
        newly_mastered: outcome.newly_mastered,
        card: outcome.card,
        cards_studied: session.cards_studied.len(),
        correct_cards: session.correct_cards.len(),
    }))
}

async fn complete_session(
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let mut session = study_session::get_session(&mut *tx, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("study session {session_id}")))?;
    if session.is_completed() {
        return Err(ApiError::Validation(format!(
            "Study session {session_id} is already completed"
        )));
    }

    let now = Utc::now();
    session.complete(now);
    study_session::update_session(&mut *tx, &session).await?;
    tx.commit().await?;

    tracing::info!(
        %session_id,
        cards = session.cards_studied.len(),
        accuracy = session.accuracy(),
        "Study session completed"
    );

    Ok(Json(SessionSummary {
        session_id,
        set_id: session.set_id,
        cards_studied: session.cards_studied.len(),
        correct_cards: session.correct_cards.len(),
        accuracy: session.accuracy(),
        session_duration: session.session_duration.unwrap_or_default(),
        started_at: session.started_at,
        completed_at: now,
    }))
}

async fn flashcard_stats(State(state): State<ApiState>) -> Result<Json<FlashcardStats>, ApiError> {
    let sessions = study_session::sessions_with_reviews(&state.pool).await?;
    let cards = flashcard::find_flashcards(&state.pool, &FlashcardFilter::default()).await?;

    let average_accuracy = if sessions.is_empty() {
        0.0
    } else {
        let sum: f64 = sessions.iter().map(StudySession::accuracy).sum();
        (sum / sessions.len() as f64 * 10.0).round() / 10.0
    };

    Ok(Json(FlashcardStats {
        total_sessions: sessions.len(),
        total_cards_studied: sessions.iter().map(|s| s.cards_studied.len()).sum(),
        average_accuracy,
        total_cards: cards.len(),
        mastered_cards: cards
            .iter()
            .filter(|c| c.recall.as_ref().is_some_and(RecallState::is_mastered))
            .count(),
    }))
}
