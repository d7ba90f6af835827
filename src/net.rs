//! Network layer.
//!
//! Two round-trip flavors over the same request/response rules: the blocking
//! [`transport`] used by the [`crate::blocking`] helpers, and the
//! asynchronous [`fetch`] used by the request client, whose future can be
//! dropped to tear the connection down.

pub mod fetch;
pub mod transport;

pub use transport::request_string;

use crate::errors::RequestError;

/// Maps a status >= 400 to a transport failure carrying the numeric code and
/// reason phrase; the body is not read as a success payload in that case.
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), RequestError> {
    if status.as_u16() >= 400 {
        return Err(RequestError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_status_passes_success_codes() {
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
        assert!(check_status(reqwest::StatusCode::NO_CONTENT).is_ok());
        assert!(check_status(reqwest::StatusCode::from_u16(399).unwrap()).is_ok());
    }

    #[test]
    fn check_status_rejects_client_and_server_errors() {
        match check_status(reqwest::StatusCode::NOT_FOUND).unwrap_err() {
            RequestError::Http { status, status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
        assert!(check_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }
}
