//! Timeout classification for connections.
//!
//! The HTTP transport reports both deadlines as the same low-level error
//! (`io::ErrorKind::TimedOut`). This decorator restores the distinction by
//! looking at which connection operation was running when it fired:
//!
//! ```text
//! send            → TransportError::ConnectTimeout(cause)
//! any other op    → TransportError::ReadTimeout(cause)
//! non-timeout     → unchanged
//! ```
//!
//! Classification only re-signals the error. Nothing is retried or swallowed.

use std::io;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};

use crate::transport::connection::{MessageSender, WebServiceConnection};
use crate::transport::error::{TimeoutPhase, TransportError};

/// The fallible operations of a [`WebServiceConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddRequestHeader,
    Send,
    HasError,
    HasFault,
    ErrorMessage,
    Receive,
    Close,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::AddRequestHeader,
        Operation::Send,
        Operation::HasError,
        Operation::HasFault,
        Operation::ErrorMessage,
        Operation::Receive,
        Operation::Close,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddRequestHeader => "add_request_header",
            Operation::Send => "send",
            Operation::HasError => "has_error",
            Operation::HasFault => "has_fault",
            Operation::ErrorMessage => "error_message",
            Operation::Receive => "receive",
            Operation::Close => "close",
        }
    }

    /// Phase a socket timeout raised by this operation belongs to.
    pub fn timeout_phase(&self) -> TimeoutPhase {
        match self {
            Operation::Send => TimeoutPhase::Connect,
            _ => TimeoutPhase::Read,
        }
    }
}

/// Reclassify a socket timeout raised by `operation`. Other results pass through.
pub fn classify<T>(
    operation: Operation,
    result: Result<T, TransportError>,
) -> Result<T, TransportError> {
    result.map_err(|err| match err {
        TransportError::Io(cause) if cause.kind() == io::ErrorKind::TimedOut => {
            let phase = operation.timeout_phase();
            tracing::debug!(
                operation = operation.name(),
                phase = ?phase,
                error = %cause,
                "Socket timeout classified"
            );
            match phase {
                TimeoutPhase::Connect => TransportError::ConnectTimeout(cause),
                TimeoutPhase::Read => TransportError::ReadTimeout(cause),
            }
        }
        other => other,
    })
}

/// Sender whose connections classify socket timeouts.
#[derive(Debug, Clone)]
pub struct TimeoutClassifyingSender<S> {
    inner: S,
}

impl<S> TimeoutClassifyingSender<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: MessageSender> MessageSender for TimeoutClassifyingSender<S> {
    type Connection = TimeoutClassifyingConnection<S::Connection>;

    fn create_connection(&self, uri: &Uri) -> Result<Self::Connection, TransportError> {
        Ok(TimeoutClassifyingConnection::new(
            self.inner.create_connection(uri)?,
        ))
    }
}

/// Connection decorator applying [`classify`] to every operation.
#[derive(Debug)]
pub struct TimeoutClassifyingConnection<C> {
    inner: C,
}

impl<C> TimeoutClassifyingConnection<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: WebServiceConnection> WebServiceConnection for TimeoutClassifyingConnection<C> {
    fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    fn request_headers(&self) -> &HeaderMap {
        self.inner.request_headers()
    }

    fn response_status(&self) -> Option<StatusCode> {
        self.inner.response_status()
    }

    fn response_headers(&self) -> Option<&HeaderMap> {
        self.inner.response_headers()
    }

    fn add_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        classify(
            Operation::AddRequestHeader,
            self.inner.add_request_header(name, value),
        )
    }

    async fn send(&mut self, body: Bytes) -> Result<(), TransportError> {
        classify(Operation::Send, self.inner.send(body).await)
    }

    async fn has_error(&mut self) -> Result<bool, TransportError> {
        classify(Operation::HasError, self.inner.has_error().await)
    }

    async fn has_fault(&mut self) -> Result<bool, TransportError> {
        classify(Operation::HasFault, self.inner.has_fault().await)
    }

    async fn error_message(&mut self) -> Result<String, TransportError> {
        classify(Operation::ErrorMessage, self.inner.error_message().await)
    }

    async fn receive(&mut self) -> Result<Option<Bytes>, TransportError> {
        classify(Operation::Receive, self.inner.receive().await)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        classify(Operation::Close, self.inner.close().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{ScriptedConnection, ScriptedFailure};

    fn timeout_cause() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "socket deadline elapsed")
    }

    async fn run_operation<C: WebServiceConnection>(
        conn: &mut C,
        operation: Operation,
    ) -> Result<(), TransportError> {
        match operation {
            Operation::AddRequestHeader => conn.add_request_header("SOAPAction", "\"\""),
            Operation::Send => conn.send(Bytes::from_static(b"<request/>")).await,
            Operation::HasError => conn.has_error().await.map(|_| ()),
            Operation::HasFault => conn.has_fault().await.map(|_| ()),
            Operation::ErrorMessage => conn.error_message().await.map(|_| ()),
            Operation::Receive => conn.receive().await.map(|_| ()),
            Operation::Close => conn.close().await,
        }
    }

    /// A connection whose `failing` operation fails with `failure`, already past `send`
    /// unless `send` itself is the one failing.
    async fn failing_connection(
        failing: Operation,
        failure: ScriptedFailure,
    ) -> TimeoutClassifyingConnection<ScriptedConnection> {
        let mut conn = TimeoutClassifyingConnection::new(
            ScriptedConnection::ok(b"<response/>").failing_on(failing, failure),
        );
        if failing != Operation::Send {
            conn.send(Bytes::from_static(b"<request/>")).await.unwrap();
        }
        conn
    }

    #[tokio::test]
    async fn send_timeout_is_connect_timeout_with_original_cause() {
        let mut conn = failing_connection(Operation::Send, ScriptedFailure::Timeout).await;
        let err = run_operation(&mut conn, Operation::Send).await.unwrap_err();

        let cause = match err {
            TransportError::ConnectTimeout(cause) => cause,
            other => panic!("expected connect timeout, got {other:?}"),
        };
        let original = timeout_cause();
        assert_eq!(cause.kind(), original.kind());
        assert_eq!(cause.to_string(), original.to_string());
    }

    #[tokio::test]
    async fn every_other_operation_times_out_as_read() {
        for operation in Operation::ALL {
            if operation == Operation::Send {
                continue;
            }
            let mut conn = failing_connection(operation, ScriptedFailure::Timeout).await;
            let err = run_operation(&mut conn, operation).await.unwrap_err();
            assert!(
                matches!(err, TransportError::ReadTimeout(ref cause) if cause.to_string() == "socket deadline elapsed"),
                "{} produced {err:?}",
                operation.name()
            );
        }
    }

    #[tokio::test]
    async fn non_timeout_errors_pass_through_unchanged() {
        for operation in Operation::ALL {
            let mut conn = failing_connection(operation, ScriptedFailure::Refused).await;
            let err = run_operation(&mut conn, operation).await.unwrap_err();
            assert!(
                matches!(err, TransportError::Io(ref e)
                    if e.kind() == io::ErrorKind::ConnectionRefused && e.to_string() == "refused by peer"),
                "{} produced {err:?}",
                operation.name()
            );
        }

        let mut conn =
            failing_connection(Operation::Receive, ScriptedFailure::InvalidState).await;
        let err = conn.receive().await.unwrap_err();
        assert_eq!(err.to_string(), "connection not ready: scripted");
    }

    #[tokio::test]
    async fn successful_exchange_is_forwarded_once() {
        let scripted = ScriptedConnection::ok(b"<response/>");
        let calls = scripted.calls();
        let mut conn = TimeoutClassifyingConnection::new(scripted);

        conn.add_request_header("SOAPAction", "\"\"").unwrap();
        conn.send(Bytes::from_static(b"<request/>")).await.unwrap();
        assert!(!conn.has_error().await.unwrap());
        assert_eq!(conn.receive().await.unwrap().unwrap(), "<response/>");
        conn.close().await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                Operation::AddRequestHeader,
                Operation::Send,
                Operation::HasError,
                Operation::Receive,
                Operation::Close,
            ]
        );
        assert_eq!(conn.response_status(), Some(StatusCode::OK));
    }

    #[test]
    fn classify_leaves_already_classified_errors_alone() {
        let err = classify::<()>(
            Operation::Receive,
            Err(TransportError::ConnectTimeout(timeout_cause())),
        )
        .unwrap_err();
        assert_eq!(err.timeout_phase(), Some(TimeoutPhase::Connect));
    }
}
