use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use np_db::{
    models::{DEFAULT_COLOR, FlashcardFilter, FlashcardSet},
    repositories::{flashcard, flashcard_set},
};
use uuid::Uuid;

use super::model::{
    CreateFlashcardSetRequest, FlashcardSetCreated, FlashcardSetList, SetCards, SetCardsQuery,
};
use crate::{ApiState, error::ApiError, flashcard::model::FlashcardView, validation};

/// Cards listed per set when no limit is given
const DEFAULT_CARD_LIMIT: usize = 20;

/// Create the flashcard set routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/flashcard-sets", get(list_sets).post(create_set))
        .route("/api/flashcard-sets/{set_id}/flashcards", get(list_set_cards))
}

async fn list_sets(State(state): State<ApiState>) -> Result<Json<FlashcardSetList>, ApiError> {
    let flashcard_sets = flashcard_set::list_sets(&state.pool).await?;
    Ok(Json(FlashcardSetList { flashcard_sets }))
}

async fn create_set(
    State(state): State<ApiState>,
    Json(payload): Json<CreateFlashcardSetRequest>,
) -> Result<(StatusCode, Json<FlashcardSetCreated>), ApiError> {
    validation::validate_payload(&payload)?;
    let color = payload.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
    validation::validate_color(&color)?;

    let set = FlashcardSet {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        category: payload.category,
        color,
        spaced_repetition_enabled: payload.spaced_repetition_enabled,
        created_at: Utc::now(),
    };
    flashcard_set::insert_set(&state.pool, &set).await?;

    tracing::info!(set_id = %set.id, "Flashcard set created");

    Ok((
        StatusCode::CREATED,
        Json(FlashcardSetCreated {
            message: "Flashcard set created",
            flashcard_set: set,
        }),
    ))
}

async fn list_set_cards(
    State(state): State<ApiState>,
    Path(set_id): Path<Uuid>,
    Query(query): Query<SetCardsQuery>,
) -> Result<Json<SetCards>, ApiError> {
    let set = flashcard_set::get_set(&state.pool, set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("flashcard set {set_id}")))?;

    let cards = flashcard::find_flashcards(
        &state.pool,
        &FlashcardFilter {
            set_id: Some(set_id),
            limit: Some(query.limit.unwrap_or(DEFAULT_CARD_LIMIT)),
        },
    )
    .await?;

    Ok(Json(SetCards {
        flashcard_set: set,
        flashcards: cards.into_iter().map(FlashcardView::from).collect(),
    }))
}
