use std::collections::BTreeMap;

use np_db::models::QuestionOption;
use np_srs::{CompetencyRecord, Difficulty, DifficultyMix};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    pub area_id: Uuid,
    pub question_count: Option<usize>,
    /// Restrict the quiz (and the score history it adapts to) to one category
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
}

/// A question as handed to the learner, without the answer
#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    pub difficulty: Difficulty,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuizStarted {
    pub quiz_id: Uuid,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: usize,
    /// Recency-weighted competency the questions were picked for
    pub competency: f64,
    pub difficulty_mix: DifficultyMix,
}

#[derive(Debug, Deserialize)]
pub struct QuizAnswer {
    pub question_id: Uuid,
    pub selected_option_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub question_id: Uuid,
    pub question_text: String,
    pub selected_option: Option<String>,
    pub correct_option: Option<String>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

/// Answers in one NCLEX category of a submitted quiz
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryPerformance {
    pub correct: u32,
    pub total: u32,
    /// Percentage correct, rounded down
    pub percentage: u32,
}

impl CategoryPerformance {
    pub(crate) const fn add(&mut self, is_correct: bool) {
        self.correct += is_correct as u32;
        self.total += 1;
        self.percentage = self.correct * 100 / self.total;
    }
}

#[derive(Debug, Serialize)]
pub struct QuizResult {
    /// Percentage score, rounded down
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    /// Score reached the configured passing score
    pub passed: bool,
    pub passing_score: u32,
    pub results: Vec<QuestionResult>,
    /// Per-category breakdown; questions without a category are left out
    pub category_performance: BTreeMap<String, CategoryPerformance>,
    /// Cumulative competency records after this quiz
    pub competency: Vec<CompetencyRecord>,
}
