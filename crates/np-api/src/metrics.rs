//! Prometheus metrics for the study API.

use std::{sync::LazyLock, time::Instant};

use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use np_srs::Difficulty;

static UUID_SEGMENT: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("uuid pattern is valid")
});

/// Install the Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full("quiz_score".to_string()),
            &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request counts and latency
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Replace ids in a path so each route is one metric series
fn normalize_path(path: &str) -> String {
    UUID_SEGMENT.replace_all(path, ":id").into_owned()
}

/// Record a flashcard review
pub fn record_review(quality: u8, mastered: bool) {
    let outcome = if quality >= np_srs::scheduler::PASSING_QUALITY {
        "recalled"
    } else {
        "forgotten"
    };
    counter!("reviews_total", "outcome" => outcome).increment(1);
    if mastered {
        counter!("reviews_mastered_total").increment(1);
    }
}

/// Record the difficulty mix handed out for a quiz
pub fn record_selection(difficulties: impl IntoIterator<Item = Difficulty>) {
    for difficulty in difficulties {
        counter!("questions_selected_total", "difficulty" => difficulty.as_str()).increment(1);
    }
}

/// Record a submitted quiz
pub fn record_quiz_submission(score: u32) {
    counter!("quiz_submissions_total").increment(1);
    histogram!("quiz_score").record(f64::from(score));
}
