pub mod cover_letter;
pub mod document;
pub mod interview;
pub mod resume;
pub mod skill_gap;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Post-extraction check applied to every structured model answer.
///
/// Returns the cleaned value, or `None` when a required field is missing or
/// unusable. `None` sends the stage to its fallback exactly like a parse error.
pub trait Normalize: Sized {
    fn normalize(self) -> Option<Self>;
}

/// Accepts a string, a number, a bool, or null (as empty) for a text field.
/// Models write `"year": 2019` as often as `"year": "2019"`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Like `lenient_string` but keeps null and blank as `None`.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    let trimmed = s.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// A list of text items where null means empty and non-text items are coerced.
pub(crate) fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                Value::Number(n) => Some(n.to_string()),
                other => Some(other.to_string()),
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    })
}

/// Reads a score written as `8`, `8.5`, `"8"` or `"82%"`. Anything else,
/// null included, is an error so required scores still fail when absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("not representable as f64: {n}"))),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("not numeric: {s}"))),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Null reads as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
