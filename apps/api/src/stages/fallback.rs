//! The one place where a completion becomes either a parsed value or a fallback.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::llm_client::extract::extract_as;
use crate::llm_client::truncate_chars;
use crate::models::Normalize;
use crate::stages::Stage;

/// Chars of the completion echoed into the diagnostic log.
const LOG_PREVIEW_CHARS: usize = 200;

/// Extracts a `T` from `completion`, or returns `fallback()` if that fails.
///
/// Failure covers all three cases alike: no JSON object, malformed JSON,
/// and an object that deserializes but does not pass `Normalize`.
pub fn parse_or_fallback<T, F>(stage: Stage, completion: &str, fallback: F) -> T
where
    T: DeserializeOwned + Normalize,
    F: FnOnce() -> T,
{
    let reason = match extract_as::<T>(completion) {
        Ok(parsed) => match parsed.normalize() {
            Some(value) => return value,
            None => "required fields missing".to_string(),
        },
        Err(e) => e.to_string(),
    };

    warn!(
        "{stage}: using fallback ({reason}); completion preview: {:?}",
        truncate_chars(completion, LOG_PREVIEW_CHARS)
    );
    fallback()
}
