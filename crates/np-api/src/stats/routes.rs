use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use np_db::{
    models::AttemptFilter,
    repositories::{area, competency as competency_records, quiz},
};

use super::model::{AreaEstimate, CompetencyQuery, CompetencyReport, QuizStats, RecentAttempt};
use crate::{ApiState, error::ApiError, quiz::routes::recent_scores};

/// Completed attempts the statistics are computed over
const STATS_WINDOW: usize = 10;
/// Attempts listed individually in the statistics
const RECENT_LISTED: usize = 5;

/// Create the reporting routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/api/stats", get(quiz_stats))
        .route("/api/competency", get(competency))
}

async fn quiz_stats(State(state): State<ApiState>) -> Result<Json<QuizStats>, ApiError> {
    let attempts = quiz::completed_attempts(
        &state.pool,
        &AttemptFilter {
            limit: Some(STATS_WINDOW),
            ..Default::default()
        },
    )
    .await?;

    let average_score = if attempts.is_empty() {
        0.0
    } else {
        let sum: f64 = attempts.iter().map(|a| f64::from(a.score)).sum();
        (sum / attempts.len() as f64 * 10.0).round() / 10.0
    };

    let mut recent_attempts = Vec::with_capacity(RECENT_LISTED);
    for a in attempts.iter().take(RECENT_LISTED) {
        let area_name = area::get_area(&state.pool, a.area_id)
            .await?
            .map_or_else(|| "Unknown".to_string(), |area| area.name);

        recent_attempts.push(RecentAttempt {
            quiz_id: a.id,
            area_id: a.area_id,
            area_name,
            score: a.score,
            total_questions: a.total_questions,
            completed_at: a.completed_at,
        });
    }

    Ok(Json(QuizStats {
        total_quizzes: attempts.len(),
        average_score,
        recent_attempts,
    }))
}

async fn competency(
    State(state): State<ApiState>,
    Query(query): Query<CompetencyQuery>,
) -> Result<Json<CompetencyReport>, ApiError> {
    let areas = match query.area_id {
        Some(area_id) => vec![
            area::get_area(&state.pool, area_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("study area {area_id}")))?,
        ],
        None => area::list_areas(&state.pool)
            .await?
            .into_iter()
            .map(|summary| summary.area)
            .collect(),
    };

    let mut estimates = Vec::with_capacity(areas.len());
    for area in areas {
        let competency =
            np_srs::estimate_competency(&recent_scores(&state.pool, area.id, None).await?);
        estimates.push(AreaEstimate {
            area_id: area.id,
            area_name: area.name,
            competency,
            difficulty_mix: *state.weights.mix_for(competency)?,
        });
    }

    Ok(Json(CompetencyReport {
        records: competency_records::list_competency(&state.pool, query.area_id).await?,
        estimates,
    }))
}
