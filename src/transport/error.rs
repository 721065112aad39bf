//! Transport error types.

use std::io;

/// Which part of an exchange a timeout was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    /// Establishing the connection or writing the request.
    Connect,
    /// Waiting for or reading the response.
    Read,
}

/// Errors raised by connections and message senders.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// A socket timeout raised while sending the request.
    #[error("connect timed out: {0}")]
    ConnectTimeout(#[source] io::Error),

    /// A socket timeout raised by any operation after the request was sent.
    #[error("read timed out: {0}")]
    ReadTimeout(#[source] io::Error),

    /// Low-level socket failure. Timeouts arrive here as `ErrorKind::TimedOut`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP protocol error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] axum::Error),

    #[error("invalid endpoint URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    /// An operation was called in the wrong order, e.g. `receive` before `send`.
    #[error("connection not ready: {0}")]
    InvalidState(&'static str),
}

impl TransportError {
    /// Build the low-level timeout error produced by socket deadlines.
    pub fn socket_timeout(message: &'static str) -> Self {
        TransportError::Io(io::Error::new(io::ErrorKind::TimedOut, message))
    }

    /// Whether this is an unclassified socket timeout.
    pub fn is_socket_timeout(&self) -> bool {
        matches!(self, TransportError::Io(e) if e.kind() == io::ErrorKind::TimedOut)
    }

    /// The phase of a classified timeout, `None` for every other error.
    pub fn timeout_phase(&self) -> Option<TimeoutPhase> {
        match self {
            TransportError::ConnectTimeout(_) => Some(TimeoutPhase::Connect),
            TransportError::ReadTimeout(_) => Some(TimeoutPhase::Read),
            _ => None,
        }
    }
}
