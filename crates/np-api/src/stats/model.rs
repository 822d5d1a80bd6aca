use chrono::{DateTime, Utc};
use np_srs::{CompetencyRecord, DifficultyMix};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct RecentAttempt {
    pub quiz_id: Uuid,
    pub area_id: Uuid,
    pub area_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct QuizStats {
    pub total_quizzes: usize,
    /// Mean score over the same window, one decimal place
    pub average_score: f64,
    pub recent_attempts: Vec<RecentAttempt>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetencyQuery {
    pub area_id: Option<Uuid>,
}

/// Recency-weighted estimate for one area and the mix it would select
#[derive(Debug, Serialize)]
pub struct AreaEstimate {
    pub area_id: Uuid,
    pub area_name: String,
    pub competency: f64,
    pub difficulty_mix: DifficultyMix,
}

#[derive(Debug, Serialize)]
pub struct CompetencyReport {
    /// Cumulative correct/attempted records, by area then category
    pub records: Vec<CompetencyRecord>,
    pub estimates: Vec<AreaEstimate>,
}
