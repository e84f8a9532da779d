use crate::error::AppError;

/// Trimmed value of a required form field.
pub fn required(label: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }
    Ok(value.to_string())
}
