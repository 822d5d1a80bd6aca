//! Flashcards: creation, spaced-repetition reviews and the due queue.

pub mod model;
pub mod routes;

pub use routes::routes;
