use std::collections::HashMap;

use chrono::{DateTime, Utc};
use np_srs::{Difficulty, PoolQuestion, RecallState, Reviewable};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, sqlite::SqliteRow, types::Json};
use uuid::Uuid;

/// Default display color for study areas and flashcard sets
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Study area model - groups questions by subject (e.g. Pharmacology)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudyArea {
    /// Unique study area identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Short description of what the area covers
    pub description: String,
    /// Hex color used by the frontend
    pub color: String,
}

/// Study area with the number of questions it holds
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudyAreaSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub area: StudyArea,
    pub question_count: i64,
}

/// One answer choice of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: Uuid,
    pub text: String,
}

/// Multiple-choice exam question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    /// Unique question identifier
    pub id: Uuid,
    /// Study area this question belongs to
    pub area_id: Uuid,
    pub question_text: String,
    /// Answer choices, in display order
    #[sqlx(json)]
    pub options: Vec<QuestionOption>,
    /// ID of the correct option
    pub correct_answer_id: Uuid,
    /// Rationale shown after the quiz
    pub explanation: Option<String>,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    /// NCLEX client-needs category (e.g. "physiological_integrity")
    pub category: Option<String>,
}

impl Question {
    /// Look up the text of one of this question's options
    pub fn option_text(&self, option_id: Uuid) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.text.as_str())
    }
}

impl PoolQuestion for Question {
    fn id(&self) -> Uuid {
        self.id
    }

    fn area_id(&self) -> Uuid {
        self.area_id
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// Flashcard set model - a named deck of related terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FlashcardSet {
    /// Unique set identifier
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Topic the set covers (e.g. "medical_terminology")
    pub category: String,
    /// Hex color used by the frontend
    pub color: String,
    /// Whether study sessions on this set follow the review schedule
    pub spaced_repetition_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Flashcard set with the number of cards it holds
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FlashcardSetSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub set: FlashcardSet,
    pub card_count: i64,
}

/// Flashcard model - a term and its definition, with spaced repetition state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique flashcard identifier
    pub id: Uuid,
    /// Flashcard set this card belongs to
    pub set_id: Uuid,
    pub term: String,
    pub definition: String,
    pub pronunciation: Option<String>,
    /// Word type (prefix, suffix, root, term)
    pub word_type: Option<String>,
    pub category: Option<String>,
    /// Example sentences using the term
    pub examples: Vec<String>,
    pub difficulty: Difficulty,
    /// When the card was created
    pub created_at: DateTime<Utc>,
    /// Recall state, `None` until the first review
    pub recall: Option<RecallState>,
}

impl Reviewable for Flashcard {
    fn recall(&self) -> Option<&RecallState> {
        self.recall.as_ref()
    }
}

// Flashcards are read joined with `flashcard_progress`; an unreviewed card
// comes back with NULL progress columns.
impl<'r> FromRow<'r, SqliteRow> for Flashcard {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let difficulty: String = row.try_get("difficulty")?;
        let difficulty = difficulty
            .parse::<Difficulty>()
            .map_err(|e| decode_error("difficulty", e))?;
        let Json(examples) = row.try_get::<Json<Vec<String>>, _>("examples")?;

        let recall = match row.try_get::<Option<f64>, _>("easiness_factor")? {
            None => None,
            Some(easiness_factor) => Some(RecallState {
                easiness_factor,
                interval: count_column(row, "interval_days")?,
                repetitions: count_column(row, "repetitions")?,
                last_reviewed: row.try_get("last_reviewed")?,
                next_review: row.try_get("next_review")?,
                review_count: count_column(row, "review_count")?,
                success_rate: row.try_get("success_rate")?,
                average_response_time: row.try_get("average_response_time")?,
            }),
        };

        Ok(Self {
            id: row.try_get("id")?,
            set_id: row.try_get("set_id")?,
            term: row.try_get("term")?,
            definition: row.try_get("definition")?,
            pronunciation: row.try_get("pronunciation")?,
            word_type: row.try_get("word_type")?,
            category: row.try_get("category")?,
            examples,
            difficulty,
            created_at: row.try_get("created_at")?,
            recall,
        })
    }
}

fn count_column(row: &SqliteRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|e| decode_error(column, e))
}

fn decode_error<E>(column: &str, source: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

/// Study session - one sitting with a flashcard set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    /// Unique session identifier
    pub id: Uuid,
    /// Flashcard set being studied
    pub set_id: Uuid,
    /// Cards reviewed so far, in review order
    #[sqlx(json)]
    pub cards_studied: Vec<Uuid>,
    /// Cards recalled successfully (quality 3 or higher)
    #[sqlx(json)]
    pub correct_cards: Vec<Uuid>,
    /// Seconds from start to completion, set when the session completes
    pub session_duration: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
    pub fn new(set_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            set_id,
            cards_studied: Vec::new(),
            correct_cards: Vec::new(),
            session_duration: None,
            started_at: now,
            completed_at: None,
        }
    }

    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Record one review. Reviewing a card twice in a session counts it once;
    /// the latest outcome wins.
    pub fn record_review(&mut self, flashcard_id: Uuid, success: bool) {
        if !self.cards_studied.contains(&flashcard_id) {
            self.cards_studied.push(flashcard_id);
        }
        self.correct_cards.retain(|id| *id != flashcard_id);
        if success {
            self.correct_cards.push(flashcard_id);
        }
    }

    /// Close the session and store its duration.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.session_duration = Some((now - self.started_at).num_seconds().max(0));
        self.completed_at = Some(now);
    }

    /// Percentage of studied cards recalled correctly, 0 for an empty session
    pub fn accuracy(&self) -> f64 {
        if self.cards_studied.is_empty() {
            return 0.0;
        }
        self.correct_cards.len() as f64 * 100.0 / self.cards_studied.len() as f64
    }
}

/// Quiz attempt - the questions handed out and, once submitted, the outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    /// Unique attempt identifier
    pub id: Uuid,
    /// Study area the quiz was drawn from
    pub area_id: Uuid,
    /// Optional NCLEX category the quiz focused on
    pub category: Option<String>,
    /// Question IDs, in the order they were handed out
    #[sqlx(json)]
    pub questions: Vec<Uuid>,
    /// Question ID -> selected option ID
    #[sqlx(json)]
    pub answers: HashMap<Uuid, Uuid>,
    /// Percentage score (0-100), 0 until submitted
    #[sqlx(try_from = "i64")]
    pub score: u32,
    #[sqlx(try_from = "i64")]
    pub total_questions: u32,
    /// Recency-weighted competency the questions were selected for
    pub competency: f64,
    pub started_at: DateTime<Utc>,
    /// Set on submission (nullable for quizzes in progress)
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Query filter for questions
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub area_id: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// Query filter for flashcards
#[derive(Debug, Clone, Default)]
pub struct FlashcardFilter {
    pub set_id: Option<Uuid>,
    pub limit: Option<usize>,
}

/// Query filter for completed quiz attempts
#[derive(Debug, Clone, Default)]
pub struct AttemptFilter {
    pub area_id: Option<Uuid>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// SQLite `LIMIT` value for an optional limit; -1 means no limit
pub(crate) fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX))
}
