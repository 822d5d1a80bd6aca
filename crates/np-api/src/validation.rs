use validator::Validate;

use crate::error::ApiError;

/// Run a payload's `validator` rules, turning failures into a 400
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string().replace('\n', "; ")))
}

/// Validate a `#RRGGBB` display color
///
/// # Examples
/// ```
/// use np_api::validation::validate_color;
///
/// assert!(validate_color("#3B82F6").is_ok());
/// assert!(validate_color("blue").is_err());
/// ```
pub fn validate_color(color: &str) -> Result<(), ApiError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Invalid color: '{color}'. Expected a hex color like '#3B82F6'"
        )))
    }
}

/// Resolve a requested question count against the configured default and maximum
pub fn question_count(
    requested: Option<usize>,
    default: usize,
    max: usize,
) -> Result<usize, ApiError> {
    match requested {
        None => Ok(default),
        Some(0) => Err(ApiError::Validation(
            "question_count must be at least 1".to_string(),
        )),
        Some(n) if n > max => Err(ApiError::Validation(format!(
            "question_count must be at most {max}, got {n}"
        ))),
        Some(n) => Ok(n),
    }
}
