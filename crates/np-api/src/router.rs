use axum::{Router, http::StatusCode, middleware, response::IntoResponse, routing::get};
use tower_http::trace::TraceLayer;

use crate::{area, flashcard, flashcard_set, metrics, quiz, state::ApiState, stats, study};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(area::routes())
        .merge(flashcard_set::routes())
        .merge(flashcard::routes())
        .merge(study::routes())
        .merge(quiz::routes())
        .merge(stats::routes())
        .fallback(handler_404)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
