use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(ValidationError(format!(
            "{field} exceeds max length {max_len}"
        )));
    }
    Ok(trimmed.to_string())
}
