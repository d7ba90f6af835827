//! Response decoding: raw response text to a typed payload, plus the in-band
//! error classification.
//!
//! Each decoder variant turns the full response body into its payload type
//! and inspects it for the wire contract's error signal. Malformed input is a
//! transport-class failure ([`crate::RequestError`]), not a business error.

pub mod json;
pub mod text;
pub mod xml;

pub use json::JsonDecoder;
pub use text::TextDecoder;
pub use xml::XmlDecoder;

use crate::errors::RequestError;

/// Fallback business-error code when the response sets the error signal but
/// omits `error_code`.
pub(crate) const FALLBACK_CODE: &str = "unknown_error";

/// Fallback business-error message when the response omits `error_message`.
pub(crate) const FALLBACK_MESSAGE: &str = "(unknown error)";

/// A decoded response, classified by the payload's own error signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// Transport succeeded and the error signal was absent or unset.
    Success(T),
    /// Transport succeeded but the payload carried an error signal.
    BusinessError { code: String, message: String },
}

/// Capability to turn raw response text into a classified, typed payload.
///
/// A [`crate::RequestClient`] is parameterized over one of these instead of
/// subclassing per payload shape.
pub trait ResponseDecoder: Send + 'static {
    type Payload: Send + 'static;

    fn decode(&self, raw: &str) -> Result<Decoded<Self::Payload>, RequestError>;
}
