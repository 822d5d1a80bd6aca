use np_db::models::{Question, StudyArea, StudyAreaSummary};
use np_srs::Difficulty;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudyAreaRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 4000))]
    pub question_text: String,
    #[validate(length(min = 2, max = 10))]
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub correct_answer_index: usize,
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub area_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudyAreaList {
    pub study_areas: Vec<StudyAreaSummary>,
}

#[derive(Debug, Serialize)]
pub struct StudyAreaCreated {
    pub message: &'static str,
    pub area: StudyArea,
}

#[derive(Debug, Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct QuestionCreated {
    pub message: &'static str,
    pub question: Question,
}

#[derive(Debug, Deserialize)]
pub struct QuestionListQuery {
    pub limit: Option<usize>,
}
