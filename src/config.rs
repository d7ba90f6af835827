use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::errors::RequestError;

/// Default request timeout, applied to both connect and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(60_000);

/// Chunk size used when reading a response body.
pub const READ_BUFFER_SIZE: usize = 4 * 1024;

/// An opaque request body plus the content type it is sent with.
///
/// JSON bodies go out as `application/json`, everything else as
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(String),
}

impl RequestBody {
    /// Builds a JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, RequestError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Builds a form-encoded body from an already encoded string.
    pub fn form(encoded: impl Into<String>) -> Self {
        Self::Form(encoded.into())
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Form(_) => "application/x-www-form-urlencoded",
        }
    }

    /// Textual representation written to the wire.
    pub fn to_text(&self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Form(encoded) => encoded.clone(),
        }
    }
}

/// Configuration for the next request sent by a client.
///
/// Mutations only affect operations started afterwards; the client snapshots
/// the configuration when `send()` is called.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// HTTP method, GET unless set otherwise.
    pub method: Method,
    /// Request headers, applied in order.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<RequestBody>,
    /// Connect and read timeout.
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
