pub mod area;
pub mod config;
pub mod error;
pub mod flashcard;
pub mod flashcard_set;
pub mod metrics;
pub mod quiz;
pub mod router;
pub mod state;
pub mod stats;
pub mod study;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
