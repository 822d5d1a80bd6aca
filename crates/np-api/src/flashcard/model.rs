use np_db::models::Flashcard;
use np_srs::{Difficulty, RecallState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlashcardRequest {
    pub set_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub term: String,
    #[validate(length(min = 1, max = 4000))]
    pub definition: String,
    #[validate(length(max = 255))]
    pub pronunciation: Option<String>,
    /// prefix, suffix, root or term
    #[validate(length(max = 50))]
    pub word_type: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    /// Example sentences using the term
    #[serde(default)]
    #[validate(length(max = 10))]
    pub examples: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
pub struct ReviewSubmission {
    /// Recall quality, 0-5
    pub quality: i64,
    /// Seconds the reviewer took to answer
    pub response_time: f64,
}

#[derive(Debug, Deserialize)]
pub struct DueQuery {
    pub limit: Option<usize>,
    pub set_id: Option<Uuid>,
}

/// A flashcard with its derived mastery flag
#[derive(Debug, Serialize)]
pub struct FlashcardView {
    #[serde(flatten)]
    pub card: Flashcard,
    pub mastered: bool,
}

impl From<Flashcard> for FlashcardView {
    fn from(card: Flashcard) -> Self {
        let mastered = card.recall.as_ref().is_some_and(RecallState::is_mastered);
        Self { card, mastered }
    }
}

#[derive(Debug, Serialize)]
pub struct DueCards {
    pub cards: Vec<FlashcardView>,
    pub count: usize,
}

/// Cards of one set that are due now, against the size of the set
#[derive(Debug, Serialize)]
pub struct DueCount {
    pub set_id: Uuid,
    pub due_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ReviewOutcome {
    pub card: FlashcardView,
    /// Recall state before this review, `None` on a first review
    pub previous: Option<RecallState>,
    /// The card crossed the mastery threshold with this review
    pub newly_mastered: bool,
}
