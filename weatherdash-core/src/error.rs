use std::fmt;

/// Classification of a failed fetch. Every kind is terminal for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Unauthorized,
    RateLimited,
    ServerUnavailable,
    /// Any other non-success status, with the status code.
    UpstreamError(u16),
    Timeout,
    NetworkUnavailable,
    MalformedResponse,
}

impl ErrorKind {
    /// Map a non-success HTTP status to its kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorKind::NotFound,
            401 => ErrorKind::Unauthorized,
            429 => ErrorKind::RateLimited,
            500 | 502 | 503 => ErrorKind::ServerUnavailable,
            other => ErrorKind::UpstreamError(other),
        }
    }

    /// Whether a later attempt may succeed without the caller changing anything.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout
                | ErrorKind::NetworkUnavailable
                | ErrorKind::ServerUnavailable
                | ErrorKind::RateLimited
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => f.write_str("invalid input"),
            ErrorKind::NotFound => f.write_str("not found"),
            ErrorKind::Unauthorized => f.write_str("unauthorized"),
            ErrorKind::RateLimited => f.write_str("rate limited"),
            ErrorKind::ServerUnavailable => f.write_str("server unavailable"),
            ErrorKind::UpstreamError(status) => write!(f, "upstream error {status}"),
            ErrorKind::Timeout => f.write_str("timeout"),
            ErrorKind::NetworkUnavailable => f.write_str("network unavailable"),
            ErrorKind::MalformedResponse => f.write_str("malformed response"),
        }
    }
}

/// A failed fetch: its kind plus the message to show the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

/// Failure below the HTTP layer: the request never produced a status.
#[derive(Debug, thiserror::Error)]
#[error("transport failure: {0}")]
pub struct TransportError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(Box::new(err))
    }
}
