//! Synchronous HTTP transport.
//!
//! Performs a single blocking round trip and returns the **fully buffered**
//! response body as text. Stateless; every call builds its own connection.
//! Status codes >= 400 are reported as [`RequestError::Http`] and the body is
//! not read as a success payload.

use std::io::Read;
use std::time::Duration;

use reqwest::Method;

use crate::config::{RequestBody, READ_BUFFER_SIZE};
use crate::errors::RequestError;

use super::check_status;

/// Performs one blocking HTTP round trip and returns the response body.
///
/// `timeout` is applied to both the connect phase and the whole round trip.
/// When a body is present its content type is derived from the body's shape
/// (see [`RequestBody::content_type`]).
pub fn request_string(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<String, RequestError> {
    let url = url::Url::parse(url)?;

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;

    let mut request = client.request(method.clone(), url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(body) = body {
        request = request
            .header(reqwest::header::CONTENT_TYPE, body.content_type())
            .body(body.to_text());
    }

    let mut response = request.send()?;
    check_status(response.status())?;

    // Read the body in fixed-size chunks until exhausted.
    let mut raw = Vec::new();
    let mut chunk = [0u8; READ_BUFFER_SIZE];
    loop {
        let read = response.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..read]);
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CONNECTION_ERROR;

    #[test]
    fn rejects_invalid_url() {
        let err = request_string(
            "not a url",
            &[],
            &Method::GET,
            None,
            Duration::from_millis(100),
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }

    #[test]
    fn connect_failure_is_connection_error() {
        // Bind a port, then drop the listener so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = request_string(
            &format!("http://{addr}/"),
            &[],
            &Method::GET,
            None,
            Duration::from_millis(500),
        )
        .unwrap_err();
        assert_eq!(err.code(), CONNECTION_ERROR);
    }
}
