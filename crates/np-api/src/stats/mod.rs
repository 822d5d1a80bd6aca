//! Read-only progress reporting: recent quiz statistics and competency.

pub mod model;
pub mod routes;

pub use routes::routes;
