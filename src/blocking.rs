//! Blocking one-shot requests.
//!
//! Thin convenience wrappers over the synchronous transport, independent of
//! the asynchronous client: they block the caller and propagate every
//! transport or parse failure as a [`RequestError`]. Bring your own error
//! handling.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::config::RequestBody;
use crate::decode::xml::XmlDocument;
use crate::errors::RequestError;
use crate::net::transport;

/// Fetches a URL and returns the response body as text.
pub fn request_string(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<String, RequestError> {
    transport::request_string(url, headers, method, body, timeout)
}

/// Fetches a URL and parses the response as a JSON object.
pub fn request_json(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<Value, RequestError> {
    let raw = transport::request_string(url, headers, method, body, timeout)?;
    let object: serde_json::Map<String, Value> = serde_json::from_str(&raw)?;
    Ok(Value::Object(object))
}

/// Fetches a URL and parses the response as a JSON array.
pub fn request_json_array(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<Value, RequestError> {
    let raw = transport::request_string(url, headers, method, body, timeout)?;
    let items: Vec<Value> = serde_json::from_str(&raw)?;
    Ok(Value::Array(items))
}

/// Fetches a URL and parses the response as an XML document.
pub fn request_xml(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<XmlDocument, RequestError> {
    let raw = transport::request_string(url, headers, method, body, timeout)?;
    XmlDocument::parse(&raw)
}
