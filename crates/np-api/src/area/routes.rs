use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use np_db::{
    models::{DEFAULT_COLOR, Question, QuestionFilter, QuestionOption, StudyArea},
    repositories::{area, question},
};
use uuid::Uuid;

use super::model::{
    CreateQuestionRequest, CreateStudyAreaRequest, QuestionCreated, QuestionList,
    QuestionListQuery, StudyAreaCreated, StudyAreaList,
};
use crate::{ApiState, error::ApiError, validation};

/// Questions returned by the area listing when no limit is given
const DEFAULT_QUESTION_LIMIT: usize = 10;

/// Create the study area and question routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/study-areas", get(list_study_areas).post(create_study_area))
        .route("/api/study-areas/{area_id}/questions", get(list_area_questions))
        .route("/api/questions", post(create_question))
}

async fn list_study_areas(State(state): State<ApiState>) -> Result<Json<StudyAreaList>, ApiError> {
    let study_areas = area::list_areas(&state.pool).await?;
    Ok(Json(StudyAreaList { study_areas }))
}

async fn create_study_area(
    State(state): State<ApiState>,
    Json(payload): Json<CreateStudyAreaRequest>,
) -> Result<(StatusCode, Json<StudyAreaCreated>), ApiError> {
    validation::validate_payload(&payload)?;
    let color = payload.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
    validation::validate_color(&color)?;

    let area = StudyArea {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        color,
    };
    area::insert_area(&state.pool, &area).await?;

    tracing::info!(area_id = %area.id, "Study area created");

    Ok((
        StatusCode::CREATED,
        Json(StudyAreaCreated {
            message: "Study area created",
            area,
        }),
    ))
}

async fn list_area_questions(
    State(state): State<ApiState>,
    Path(area_id): Path<Uuid>,
    Query(query): Query<QuestionListQuery>,
) -> Result<Json<QuestionList>, ApiError> {
    if area::get_area(&state.pool, area_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("study area {area_id}")));
    }

    let questions = question::find_questions(
        &state.pool,
        &QuestionFilter {
            area_id: Some(area_id),
            limit: Some(query.limit.unwrap_or(DEFAULT_QUESTION_LIMIT)),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(QuestionList { questions }))
}

async fn create_question(
    State(state): State<ApiState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionCreated>), ApiError> {
    validation::validate_payload(&payload)?;

    if payload.correct_answer_index >= payload.options.len() {
        return Err(ApiError::Validation(format!(
            "Invalid correct answer index {} for {} options",
            payload.correct_answer_index,
            payload.options.len()
        )));
    }
    if area::get_area(&state.pool, payload.area_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("study area {}", payload.area_id)));
    }

    let options: Vec<QuestionOption> = payload
        .options
        .into_iter()
        .map(|text| QuestionOption {
            id: Uuid::new_v4(),
            text,
        })
        .collect();
    let correct_answer_id = options[payload.correct_answer_index].id;

    let question = Question {
        id: Uuid::new_v4(),
        area_id: payload.area_id,
        question_text: payload.question_text,
        options,
        correct_answer_id,
        explanation: payload.explanation,
        difficulty: payload.difficulty,
        category: payload.category,
    };
    question::insert_question(&state.pool, &question).await?;

    Ok((
        StatusCode::CREATED,
        Json(QuestionCreated {
            message: "Question created",
            question,
        }),
    ))
}
