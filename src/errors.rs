/// Coarse error kind for timeout, socket and host-resolution failures.
pub const CONNECTION_ERROR: &str = "connection_error";

/// Coarse error kind for every other transport-class failure.
pub const UNKNOWN_ERROR: &str = "unknown_error";

/// Transport-class failures: everything that can go wrong between building
/// the request and handing a decoded payload to the caller.
///
/// Business errors signaled inside an otherwise well-formed response body are
/// not represented here; they are classified by the response decoders.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("background task failed: {0}")]
    Task(String),
}

impl RequestError {
    /// Coarse error kind reported to listeners: [`CONNECTION_ERROR`] for
    /// timeout, socket and host-resolution failures, [`UNKNOWN_ERROR`]
    /// otherwise.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(e) if e.is_timeout() || e.is_connect() => CONNECTION_ERROR,
            Self::Read(_) => CONNECTION_ERROR,
            _ => UNKNOWN_ERROR,
        }
    }
}
