//! Decode-and-validate step for the model's answer.
//!
//! The model is asked for a bare JSON object, but its text is untrusted:
//! anything other than exactly `description` + `entity` (both strings) is
//! rejected as [`EnrichError::MalformedModelOutput`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vision_llm_service::error_handler::make_snippet;

use crate::error::EnrichError;

/// Caption returned for one image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImageCaption {
    /// Free text, at most three sentences by instruction.
    pub description: String,
    /// Single noun naming the primary object.
    pub entity: String,
}

/// Parses the raw model text into an [`ImageCaption`].
///
/// Surrounding whitespace and a single Markdown code fence (```` ``` ```` or
/// ```` ```json ````) are tolerated; nothing else is repaired.
///
/// # Errors
/// [`EnrichError::MalformedModelOutput`] when the text is not a JSON object
/// with exactly the two expected string keys.
pub fn parse_caption(raw: &str) -> Result<ImageCaption, EnrichError> {
    let malformed = |why: String| {
        EnrichError::MalformedModelOutput(format!("{why}; raw: {}", make_snippet(raw)))
    };

    let value: Value = serde_json::from_str(strip_code_fence(raw.trim()))
        .map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return s;
    };
    // Optional language tag, with or without a newline after it.
    inner
        .trim_start()
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim()
}
