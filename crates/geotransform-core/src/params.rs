//! Untyped request parameters and their coercion rules.
//!
//! Parameters arrive as a JSON object whose values may be numbers or numeric
//! strings. [`Params`] holds that object and offers typed lookups with
//! defaults; the per-kind records in [`crate::transform`] are built from it
//! before any pixel is touched.
//!
//! Coercion rules:
//! - floats accept numbers and numeric strings; the result must be finite
//! - integers accept integers, floats (truncated toward zero) and integer strings
//! - `null` counts as missing
//! - booleans, arrays and objects are rejected

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::transform::TransformError;

/// The params payload was not a JSON object.
#[derive(Debug, Error)]
#[error("Invalid params format: {0}")]
pub struct ParamsFormatError(pub String);

/// Parameter mapping supplied with a transformation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Create an empty parameter set (every lookup yields its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON-encoded parameter object.
    ///
    /// # Errors
    ///
    /// Returns `ParamsFormatError` if the text is not valid JSON or is valid
    /// JSON but not an object.
    pub fn from_json(text: &str) -> Result<Self, ParamsFormatError> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(ParamsFormatError(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
            Err(e) => Err(ParamsFormatError(e.to_string())),
        }
    }

    /// Builder-style insert, mostly for tests and bindings.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value for `key`, with `null` treated as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a finite float, falling back to `default` when absent.
    pub fn get_f64(&self, key: &str, default: f64) -> Result<f64, TransformError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(v) if v.is_finite() => Ok(v),
            Some(_) => Err(TransformError::invalid(key, "must be a finite number")),
            None => Err(TransformError::invalid(
                key,
                format!("expected a number, got {}", describe(value)),
            )),
        }
    }

    /// Read an integer, falling back to `default` when absent.
    ///
    /// Fractional numbers are truncated toward zero.
    pub fn get_i64(&self, key: &str, default: i64) -> Result<i64, TransformError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| {
            TransformError::invalid(key, format!("expected an integer, got {}", describe(value)))
        })
    }

    /// Read a string value, falling back to `default` when absent.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, TransformError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(TransformError::invalid(
                key,
                format!("expected a string, got {}", describe(other)),
            )),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => json_type_name(other).to_string(),
    }
}
