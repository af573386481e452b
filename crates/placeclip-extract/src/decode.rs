//! Decoding raw generator text into a JSON object.

use serde_json::{Map, Value};

use crate::coerce::kind_of;
use crate::error::{ExtractError, ExtractResult};

/// Strip a surrounding markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
        _ => rest.trim_start_matches("json"),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse generator output as a JSON object.
///
/// Text that is not JSON is a malformed response; JSON that is not an
/// object is a structural mismatch.
pub fn decode_response(text: &str) -> ExtractResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| ExtractError::malformed(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractError::mismatch(format!(
            "top-level value: expected object, found {}",
            kind_of(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = decode_response("Sure! Here is the JSON you asked for").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_non_object_is_mismatch() {
        let err = decode_response("[1, 2, 3]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMismatch);
        assert_eq!(err.detail(), "top-level value: expected object, found array");
    }

    #[test]
    fn test_fenced_object_decodes() {
        let map = decode_response("```json\n{\"PLACE_NAME\": \"Joe's\"}\n```").unwrap();
        assert_eq!(map["PLACE_NAME"], "Joe's");
    }
}
