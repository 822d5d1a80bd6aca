//! Adaptive quizzes: start a quiz sized to the learner's recent competency,
//! then submit answers to score it and update the long-run competency records.

pub mod model;
pub mod routes;

pub use routes::routes;
