use crate::error::{AppError, AppResult};

/// Validate that a fill level is a real number between 0 and 100.
///
/// Applied on every write of `volume_percentage`. NaN is rejected the same
/// way as out-of-range input.
///
/// # Errors
///
/// Returns `AppError::Validation` on the `volume_percentage` field if the
/// value is negative, exceeds 100, or is not a number.
pub fn validate_volume_percentage(value: f64) -> AppResult<f64> {
    if value.is_nan() {
        return Err(AppError::Validation {
            field: "volume_percentage",
            message: "Volume percentage must be a number.".to_string(),
        });
    }
    if value < 0.0 {
        return Err(AppError::Validation {
            field: "volume_percentage",
            message: format!("{value} is less than 0. Volume percentage must be non-negative."),
        });
    }
    if value > 100.0 {
        return Err(AppError::Validation {
            field: "volume_percentage",
            message: format!("{value} is greater than 100. Volume percentage cannot exceed 100%."),
        });
    }
    Ok(value)
}
