//! Response Decoding
//!
//! List responses come in exactly two recognised shapes: a bare array or an
//! object wrapping the array under `wishes`. Anything else is a decode error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{SyncError, SyncResult, Wish};

/// Recognised list response shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ListPayload {
    /// `[...]`
    Bare(Vec<Wish>),
    /// `{"wishes": [...]}`
    Wrapped(Vec<Wish>),
}

impl ListPayload {
    pub fn decode(body: &str) -> SyncResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SyncError::Decode(format!("list body is not JSON: {}", e)))?;

        match value {
            Value::Array(_) => Ok(ListPayload::Bare(wishes_from(value)?)),
            Value::Object(mut map) => match map.remove("wishes") {
                Some(inner @ Value::Array(_)) => Ok(ListPayload::Wrapped(wishes_from(inner)?)),
                _ => Err(SyncError::Decode(format!(
                    "expected an array or an object with a `wishes` array, got object with keys [{}]",
                    map.keys().cloned().collect::<Vec<_>>().join(", ")
                ))),
            },
            other => Err(SyncError::Decode(format!(
                "expected an array or an object with a `wishes` array, got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn into_wishes(self) -> Vec<Wish> {
        match self {
            ListPayload::Bare(wishes) | ListPayload::Wrapped(wishes) => wishes,
        }
    }
}

fn wishes_from(value: Value) -> SyncResult<Vec<Wish>> {
    serde_json::from_value(value).map_err(|e| SyncError::Decode(format!("invalid wish: {}", e)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode a single JSON body
pub fn decode_json<T: DeserializeOwned>(body: &str) -> SyncResult<T> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}
