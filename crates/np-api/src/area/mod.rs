//! Study areas and their question bank.

pub mod model;
pub mod routes;

pub use routes::routes;
