//! Study sessions over a flashcard set, and the statistics they feed.

pub mod model;
pub mod routes;

pub use routes::routes;
