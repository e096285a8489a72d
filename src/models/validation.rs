//! Schema validation of incoming payloads

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Decode a raw JSON payload into `T` and run its validation rules.
///
/// Decoding is strict: field types must match exactly and unknown fields are
/// refused by the target types. The returned error names the offending field.
pub fn validate_payload<T>(payload: Value) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let data: T =
        serde_json::from_value(payload).map_err(|e| AppError::Validation(e.to_string()))?;
    data.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(data)
}

/// Build a cross-field rule violation with a readable message
pub(crate) fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Accept a list, `null`, `""`, or a missing field; the last three mean "none".
pub(crate) fn list_or_blank<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value @ Value::Array(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a list, null or an empty string, found {}",
            other
        ))),
    }
}
