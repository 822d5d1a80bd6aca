//! SRS (Spaced Repetition System) library for NursePrep
//!
//! This crate provides the study engine's pure algorithms:
//!
//! * [`scheduler`]: the SM-2 review scheduler for flashcards
//! * [`due`]: picking which flashcards to review next
//! * [`competency`]: recency-weighted and cumulative mastery estimates
//! * [`selector`]: adaptive, difficulty-stratified question selection
//!
//! Nothing in here reads the clock or touches storage. Callers pass the
//! current time in and persist whatever comes back.

pub mod competency;
pub mod due;
pub mod error;
pub mod scheduler;
pub mod selector;

pub use competency::{CompetencyRecord, NEUTRAL_COMPETENCY, RECENT_SCORE_WINDOW, estimate_competency};
pub use due::{Reviewable, select_due};
pub use error::SrsError;
pub use scheduler::{MAX_INTERVAL_DAYS, Quality, RecallState, Review, schedule};
pub use selector::{
    Difficulty, DifficultyMix, PoolQuestion, QuestionPool, WeightTable, select_questions,
    tier_targets,
};
