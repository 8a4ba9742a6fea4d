use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CastKind {
    Id,
    Number,
    Integer,
    String,
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CastKind::Id => "ProductId",
            CastKind::Number => "Number",
            CastKind::Integer => "Integer",
            CastKind::String => "String",
        };
        f.write_str(s)
    }
}

/// A raw value the store could not coerce into the type a path expects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cast to {kind} failed for value \"{value}\" (type {value_type}) at path \"{path}\"")]
pub struct CastError {
    pub kind: CastKind,
    pub value: String,
    pub value_type: &'static str,
    pub path: String,
}

impl CastError {
    pub fn new(kind: CastKind, path: &str, value: &Value) -> Self {
        CastError {
            kind,
            value: render(value),
            value_type: type_name(value),
            path: path.to_string(),
        }
    }

    pub fn from_text(kind: CastKind, path: &str, raw: &str) -> Self {
        CastError {
            kind,
            value: raw.to_string(),
            value_type: "string",
            path: path.to_string(),
        }
    }
}

/// `null` counts as missing. Numbers and booleans are stringified.
pub fn cast_string(path: &str, value: Option<&Value>) -> Result<Option<String>, CastError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(CastError::new(CastKind::String, path, other)),
    }
}

pub fn cast_number(path: &str, value: Option<&Value>) -> Result<Option<f64>, CastError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| CastError::new(CastKind::Number, path, &Value::Number(n.clone()))),
        Some(Value::String(s)) => parse_number(path, s).map(Some),
        Some(other) => Err(CastError::new(CastKind::Number, path, other)),
    }
}

/// Parses a query-string number. Surrounding whitespace is ignored.
pub fn parse_number(path: &str, raw: &str) -> Result<f64, CastError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| CastError::from_text(CastKind::Number, path, raw))
}

pub fn parse_integer(path: &str, raw: &str) -> Result<i64, CastError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CastError::from_text(CastKind::Integer, path, raw))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
