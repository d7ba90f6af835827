//! Asynchronous round trip used by the request client.
//!
//! Same request and response rules as the blocking [`super::transport`], but
//! returned as a future: cancelling the operation drops the future, which
//! closes the connection instead of leaving the socket open until the
//! timeout expires.

use std::time::Duration;

use reqwest::Method;

use crate::config::RequestBody;
use crate::errors::RequestError;

use super::check_status;

/// Performs one HTTP round trip and returns the response body as text.
///
/// `timeout` is applied to both the connect phase and the whole round trip.
pub async fn fetch_string(
    url: &str,
    headers: &[(String, String)],
    method: &Method,
    body: Option<&RequestBody>,
    timeout: Duration,
) -> Result<String, RequestError> {
    let url = url::Url::parse(url)?;

    let client = reqwest::Client::builder()
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

    let mut response = request.send().await?;
    check_status(response.status())?;

    // Accumulate the body chunk by chunk as the transport delivers it.
    let mut raw = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        raw.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CONNECTION_ERROR;

    #[tokio::test]
    async fn rejects_invalid_url() {
        let err = fetch_string(
            "not a url",
            &[],
            &Method::GET,
            None,
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn connect_failure_is_connection_error() {
        // Bind a port, then drop the listener so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetch_string(
            &format!("http://{addr}/"),
            &[],
            &Method::GET,
            None,
            Duration::from_millis(500),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), CONNECTION_ERROR);
    }
}
