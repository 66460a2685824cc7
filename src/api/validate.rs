use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Collects per-field problems so one response can report all of them.
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value, recording an error when it is absent or blank.
    pub fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.0.insert(field.to_string(), "Campo obrigatório".to_string());
                String::new()
            }
        }
    }

    /// `Ok` when nothing was recorded, otherwise a validation error carrying
    /// `message` and the collected fields.
    pub fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.0)))
        }
    }
}

/// Blank optional text is treated as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A score must be a JSON number within [0, 10].
pub fn validate_score(value: Option<&Value>) -> Result<f64, ApiError> {
    match value.and_then(Value::as_f64) {
        Some(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Ok(score),
        _ => Err(ApiError::validation_error(
            "Nota deve ser um número entre 0 e 10",
            Some(HashMap::from([(
                "nota".to_string(),
                "Deve ser um número entre 0 e 10".to_string(),
            )])),
        )),
    }
}
