use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use np_db::{
    models::{Flashcard, FlashcardFilter},
    repositories::{flashcard, flashcard_set},
};
use np_srs::{Quality, RecallState, Review};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::model::{
    CreateFlashcardRequest, DueCards, DueCount, DueQuery, FlashcardView, ReviewOutcome,
    ReviewSubmission,
};
use crate::{ApiState, error::ApiError, metrics, validation};

/// Hard cap on the due query, whatever the client asks for
const MAX_DUE_LIMIT: usize = 200;

/// Create the flashcard routes
pub fn routes() -> Router<ApiState> {
    // Every parameter directly under /api/flashcards must share one name,
    // even where it is a set id
    Router::new()
        .route("/api/flashcards", post(create_flashcard))
        .route("/api/flashcards/due", get(due_flashcards))
        .route("/api/flashcards/{id}", get(get_flashcard))
        .route("/api/flashcards/{id}/review", post(submit_review))
        .route("/api/flashcards/{id}/due-count", get(due_count))
}

async fn create_flashcard(
    State(state): State<ApiState>,
    Json(payload): Json<CreateFlashcardRequest>,
) -> Result<(StatusCode, Json<FlashcardView>), ApiError> {
    validation::validate_payload(&payload)?;

    if flashcard_set::get_set(&state.pool, payload.set_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("flashcard set {}", payload.set_id)));
    }

    let card = Flashcard {
        id: Uuid::new_v4(),
        set_id: payload.set_id,
        term: payload.term,
        definition: payload.definition,
        pronunciation: payload.pronunciation,
        word_type: payload.word_type,
        category: payload.category,
        examples: payload.examples,
        difficulty: payload.difficulty,
        created_at: Utc::now(),
        recall: None,
    };
    flashcard::insert_flashcard(&state.pool, &card).await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

async fn get_flashcard(
    State(state): State<ApiState>,
    Path(flashcard_id): Path<Uuid>,
) -> Result<Json<FlashcardView>, ApiError> {
    let card = flashcard::get_flashcard(&state.pool, flashcard_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {flashcard_id}")))?;

    Ok(Json(card.into()))
}

async fn due_flashcards(
    State(state): State<ApiState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueCards>, ApiError> {
    let limit = query.limit.unwrap_or(state.config.due_card_limit);
    if limit > MAX_DUE_LIMIT {
        return Err(ApiError::Validation(format!(
            "limit must be at most {MAX_DUE_LIMIT}, got {limit}"
        )));
    }

    let cards = flashcard::find_flashcards(
        &state.pool,
        &FlashcardFilter {
            set_id: query.set_id,
            ..Default::default()
        },
    )
    .await?;
    let due = np_srs::select_due(&cards, Utc::now(), limit)?;

    tracing::debug!(available = cards.len(), selected = due.len(), "Due cards selected");

    let cards: Vec<FlashcardView> = due.into_iter().map(FlashcardView::from).collect();
    Ok(Json(DueCards {
        count: cards.len(),
        cards,
    }))
}

async fn due_count(
    State(state): State<ApiState>,
    Path(set_id): Path<Uuid>,
) -> Result<Json<DueCount>, ApiError> {
    if flashcard_set::get_set(&state.pool, set_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("flashcard set {set_id}")));
    }

    let cards = flashcard::find_flashcards(
        &state.pool,
        &FlashcardFilter {
            set_id: Some(set_id),
            ..Default::default()
        },
    )
    .await?;

    // Never-reviewed cards are due
    let now = Utc::now();
    let due_count = cards
        .iter()
        .filter(|c| c.recall.as_ref().is_none_or(|r| r.is_due(now)))
        .count();

    Ok(Json(DueCount {
        set_id,
        due_count,
        total_count: cards.len(),
    }))
}

async fn submit_review(
    State(state): State<ApiState>,
    Path(flashcard_id): Path<Uuid>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    // Reject bad input before touching storage
    let review = payload.to_review()?;

    let mut tx = state.pool.begin().await?;
    let outcome = review_card(&mut tx, flashcard_id, review).await?;
    tx.commit().await?;

    Ok(Json(outcome))
}

/// Apply one review to a stored card and persist its new recall state.
///
/// Runs on the caller's connection so it can share a transaction with other
/// writes.
pub(crate) async fn review_card(
    conn: &mut SqliteConnection,
    flashcard_id: Uuid,
    review: Review,
) -> Result<ReviewOutcome, ApiError> {
    let card = flashcard::get_flashcard(&mut *conn, flashcard_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {flashcard_id}")))?;

    let previous = card.recall.clone();
    let was_mastered = previous.as_ref().is_some_and(RecallState::is_mastered);
    let next = np_srs::schedule(&previous.clone().unwrap_or_default(), review, Utc::now())?;

    flashcard::upsert_progress(&mut *conn, flashcard_id, &next).await?;

    let view = FlashcardView::from(Flashcard {
        recall: Some(next),
        ..card
    });
    let newly_mastered = view.mastered && !was_mastered;
    metrics::record_review(review.quality.value(), newly_mastered);

    tracing::info!(
        %flashcard_id,
        quality = review.quality.value(),
        interval = view.card.recall.as_ref().map_or(0, |r| r.interval),
        mastered = view.mastered,
        "Flashcard reviewed"
    );

    Ok(ReviewOutcome {
        card: view,
        previous,
        newly_mastered,
    })
}

impl ReviewSubmission {
    /// Check the raw quality and response time
    pub(crate) fn to_review(&self) -> Result<Review, ApiError> {
        let quality = Quality::try_from(self.quality)?;
        Ok(Review::new(quality, self.response_time)?)
    }
}
