use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flashcard::model::FlashcardView;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub set_id: Uuid,
    /// Cards to hand out, defaults to the configured session size
    pub max_cards: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SessionStarted {
    pub session_id: Uuid,
    pub set_id: Uuid,
    /// Cards were picked by the review schedule rather than set order
    pub spaced_repetition: bool,
    pub flashcards: Vec<FlashcardView>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SessionReviewRequest {
    pub card_id: Uuid,
    /// Recall quality, 0-5
    pub quality: i64,
    /// Seconds the reviewer took to answer
    pub response_time: f64,
}

#[derive(Debug, Serialize)]
pub struct SessionReviewOutcome {
    pub session_id: Uuid,
    pub card: FlashcardView,
    pub next_review_in_days: u32,
    /// Running success rate of the card over all its reviews
    pub success_rate: f64,
    pub newly_mastered: bool,
    pub cards_studied: usize,
    pub correct_cards: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub set_id: Uuid,
    pub cards_studied: usize,
    pub correct_cards: usize,
    /// Percentage of studied cards recalled correctly
    pub accuracy: f64,
    /// Seconds from start to completion
    pub session_duration: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardStats {
    /// Sessions in which at least one card was reviewed
    pub total_sessions: usize,
    pub total_cards_studied: usize,
    /// Mean session accuracy, as a percentage rounded to one decimal
    pub average_accuracy: f64,
    pub total_cards: usize,
    pub mastered_cards: usize,
}
