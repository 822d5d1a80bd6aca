//! Flashcard sets: named decks that group related cards.

pub mod model;
pub mod routes;

pub use routes::routes;
