use np_db::models::{FlashcardSet, FlashcardSetSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::flashcard::model::FlashcardView;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlashcardSetRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub color: Option<String>,
    #[serde(default = "default_spaced_repetition")]
    pub spaced_repetition_enabled: bool,
}

const fn default_spaced_repetition() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct FlashcardSetList {
    pub flashcard_sets: Vec<FlashcardSetSummary>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardSetCreated {
    pub message: &'static str,
    pub flashcard_set: FlashcardSet,
}

#[derive(Debug, Deserialize)]
pub struct SetCardsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SetCards {
    pub flashcard_set: FlashcardSet,
    pub flashcards: Vec<FlashcardView>,
}
