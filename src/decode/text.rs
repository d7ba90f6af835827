use super::{Decoded, ResponseDecoder};
use crate::errors::RequestError;

/// Passes the raw response text through unchanged.
///
/// There is no business-error channel for plain text; every decoded response
/// is a success.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder;

impl ResponseDecoder for TextDecoder {
    type Payload = String;

    fn decode(&self, raw: &str) -> Result<Decoded<String>, RequestError> {
        Ok(Decoded::Success(raw.to_string()))
    }
}
