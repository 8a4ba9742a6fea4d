use crate::domain_model::CastError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn required(path: &str) -> Self {
        FieldError {
            path: path.to_string(),
            message: format!("Path `{}` is required.", path),
        }
    }
}

impl From<CastError> for FieldError {
    fn from(err: CastError) -> Self {
        FieldError {
            path: err.path.clone(),
            message: err.to_string(),
        }
    }
}

/// Every field failure of one rejected write, in schema order.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{model} validation failed{}", render_fields(.errors))]
pub struct ValidationError {
    pub model: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(model: &'static str) -> Self {
        ValidationError {
            model,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: impl Into<FieldError>) {
        self.errors.push(error.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn render_fields(errors: &[FieldError]) -> String {
    let fields: Vec<String> = errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect();
    if fields.is_empty() {
        String::new()
    } else {
        format!(": {}", fields.join(", "))
    }
}
