use thiserror::Error;

/// Errors raised by the study algorithms.
///
/// Both variants abort the operation before any state is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SrsError {
    /// An input was outside its accepted range.
    #[error("validation error: {0}")]
    Validation(String),
    /// The source set had nothing to select from.
    #[error("no content available: {0}")]
    EmptyPool(String),
}
