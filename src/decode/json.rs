use serde_json::{Map, Value};

use super::{Decoded, ResponseDecoder, FALLBACK_CODE, FALLBACK_MESSAGE};
use crate::errors::RequestError;

/// Decodes the response as a single JSON object.
///
/// The object is a business error when it carries `"error": true`; the code
/// and message are then read from `error_code`/`error_message` with the
/// documented fallbacks. Anything that does not parse as a JSON object is a
/// transport-class decode failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    type Payload = Value;

    fn decode(&self, raw: &str) -> Result<Decoded<Value>, RequestError> {
        let object: Map<String, Value> = serde_json::from_str(raw)?;

        let is_error = object.get("error").and_then(Value::as_bool).unwrap_or(false);
        if is_error {
            let code = object
                .get("error_code")
                .and_then(Value::as_str)
                .unwrap_or(FALLBACK_CODE)
                .to_string();
            let message = object
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or(FALLBACK_MESSAGE)
                .to_string();
            return Ok(Decoded::BusinessError { code, message });
        }

        Ok(Decoded::Success(Value::Object(object)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_success() {
        let decoded = JsonDecoder.decode("{}").unwrap();
        assert_eq!(decoded, Decoded::Success(json!({})));
    }

    #[test]
    fn error_false_is_success_with_full_object() {
        let decoded = JsonDecoder.decode(r#"{"error": false, "data": 1}"#).unwrap();
        assert_eq!(decoded, Decoded::Success(json!({"error": false, "data": 1})));
    }

    #[test]
    fn non_boolean_error_is_success() {
        let decoded = JsonDecoder.decode(r#"{"error": "yes"}"#).unwrap();
        assert!(matches!(decoded, Decoded::Success(_)));
    }

    #[test]
    fn error_true_extracts_code_and_message() {
        let decoded = JsonDecoder
            .decode(r#"{"error": true, "error_code": "X", "error_message": "Y"}"#)
            .unwrap();
        assert_eq!(
            decoded,
            Decoded::BusinessError {
                code: "X".to_string(),
                message: "Y".to_string(),
            }
        );
    }

    #[test]
    fn error_true_without_details_falls_back() {
        let decoded = JsonDecoder.decode(r#"{"error": true}"#).unwrap();
        assert_eq!(
            decoded,
            Decoded::BusinessError {
                code: "unknown_error".to_string(),
                message: "(unknown error)".to_string(),
            }
        );
    }

    #[test]
    fn malformed_json_is_decode_failure() {
        let err = JsonDecoder.decode("not json").unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
    }

    #[test]
    fn array_is_decode_failure() {
        let err = JsonDecoder.decode("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, RequestError::Json(_)));
    }
}
