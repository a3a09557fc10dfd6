//! Recovers one JSON object from free-form model output.
//!
//! Models are told to answer with bare JSON, but regularly wrap it in prose or
//! markdown fences. The scan takes everything from the first `{` to the last `}`
//! and parses that span. Nothing here knows which stage produced the text.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in completion")]
    NoObject,

    #[error("JSON object could not be parsed: {0}")]
    Malformed(serde_json::Error),

    #[error("JSON object does not match the expected schema: {0}")]
    Schema(serde_json::Error),
}

/// Finds and parses the `{ ... }` span of `text`.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractionError> {
    let start = text.find('{').ok_or(ExtractionError::NoObject)?;
    let end = text.rfind('}').ok_or(ExtractionError::NoObject)?;
    if end < start {
        return Err(ExtractionError::NoObject);
    }

    // Both delimiters are ASCII, so the byte slice sits on char boundaries.
    serde_json::from_str(&text[start..=end]).map_err(ExtractionError::Malformed)
}

/// Extracts the object and deserializes it into `T`.
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Result<T, ExtractionError> {
    let value = extract_json_object(text)?;
    serde_json::from_value(value).map_err(ExtractionError::Schema)
}
