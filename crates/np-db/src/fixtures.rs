//! Parent rows for repository tests.

use chrono::Utc;
use np_srs::Difficulty;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    models::{DEFAULT_COLOR, Flashcard, FlashcardSet, Question, QuestionOption, StudyArea},
    repositories::{area, flashcard, flashcard_set, question},
};

pub(crate) async fn stored_area(pool: &SqlitePool, name: &str) -> StudyArea {
    let area = StudyArea {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} questions"),
        color: DEFAULT_COLOR.to_string(),
    };
    area::insert_area(pool, &area).await.unwrap();
    area
}

pub(crate) fn question(area_id: Uuid, difficulty: Difficulty, category: Option<&str>) -> Question {
    let options: Vec<_> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|text| QuestionOption {
            id: Uuid::new_v4(),
            text: text.to_string(),
        })
        .collect();
    Question {
        id: Uuid::new_v4(),
        area_id,
        question_text: "Which action should the nurse take first?".to_string(),
        correct_answer_id: options[0].id,
        options,
        explanation: None,
        difficulty,
        category: category.map(str::to_string),
    }
}

pub(crate) async fn stored_question(
    pool: &SqlitePool,
    area_id: Uuid,
    difficulty: Difficulty,
    category: Option<&str>,
) -> Question {
    let q = question(area_id, difficulty, category);
    question::insert_question(pool, &q).await.unwrap();
    q
}

pub(crate) async fn stored_set(pool: &SqlitePool, name: &str) -> FlashcardSet {
    let set = FlashcardSet {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} terms"),
        category: "medical_terminology".to_string(),
        color: DEFAULT_COLOR.to_string(),
        spaced_repetition_enabled: true,
        created_at: Utc::now(),
    };
    flashcard_set::insert_set(pool, &set).await.unwrap();
    set
}

pub(crate) async fn stored_card(pool: &SqlitePool, set_id: Uuid, term: &str) -> Flashcard {
    let card = Flashcard {
        id: Uuid::new_v4(),
        set_id,
        term: term.to_string(),
        definition: format!("meaning of {term}"),
        pronunciation: None,
        word_type: Some("prefix".to_string()),
        category: None,
        examples: vec![format!("{term} in a sentence")],
        difficulty: Difficulty::Medium,
        created_at: Utc::now(),
        recall: None,
    };
    flashcard::insert_flashcard(pool, &card).await.unwrap();
    card
}
