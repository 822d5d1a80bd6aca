//! Competency model.
//!
//! Two signals are kept apart on purpose:
//!
//! * [`estimate_competency`] is a short window, recency weighted average of
//!   quiz scores. It drives the difficulty mix of the next quiz.
//! * [`CompetencyRecord`] is the long-run accuracy per study area and
//!   category. It is what gets reported back to the learner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of most recent scores that feed the estimate.
pub const RECENT_SCORE_WINDOW: usize = 10;

/// Estimate used when there is no quiz history yet.
pub const NEUTRAL_COMPETENCY: f64 = 0.5;

/// Highest possible quiz score.
const MAX_SCORE: f64 = 100.0;

/// Estimate competency from quiz scores (0-100), ordered oldest to newest.
///
/// Only the last [`RECENT_SCORE_WINDOW`] scores count. Inside that window the
/// i-th oldest score has weight `i`, so the newest score dominates.
///
/// Returns a value in `[0, 1]`.
pub fn estimate_competency(recent_scores: &[f64]) -> f64 {
    let start = recent_scores.len().saturating_sub(RECENT_SCORE_WINDOW);
    let window = &recent_scores[start..];

    if window.is_empty() {
        return NEUTRAL_COMPETENCY;
    }

    let (weighted, total_weight) = window
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weights), (i, &score)| {
            let weight = (i + 1) as f64;
            let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, MAX_SCORE) };
            (sum + score * weight, weights + weight)
        });

    (weighted / total_weight / MAX_SCORE).clamp(0.0, 1.0)
}

/// Cumulative accuracy for one (study area, category) pair.
///
/// `category == None` is the aggregate over the whole study area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyRecord {
    pub area_id: Uuid,
    pub category: Option<String>,
    /// `correct_count / question_count`, or 0 before the first answer
    pub competency: f64,
    pub question_count: u32,
    pub correct_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl CompetencyRecord {
    /// A fresh record with no answers yet.
    pub fn new(area_id: Uuid, category: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            area_id,
            category,
            competency: 0.0,
            question_count: 0,
            correct_count: 0,
            updated_at: now,
        }
    }

    /// Fold in `total` answered questions of which `correct` were right.
    ///
    /// `correct` is capped at `total`.
    pub fn record(&mut self, correct: u32, total: u32, now: DateTime<Utc>) {
        if total == 0 {
            return;
        }

        self.question_count = self.question_count.saturating_add(total);
        self.correct_count = self.correct_count.saturating_add(correct.min(total));
        self.competency = f64::from(self.correct_count) / f64::from(self.question_count);
        self.updated_at = now;
    }
}
