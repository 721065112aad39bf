//! Scripted connections for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode, Uri};

use crate::soap::SOAP_CONTENT_TYPE;
use crate::transport::connection::{is_xml_content_type, MessageSender, WebServiceConnection};
use crate::transport::error::TransportError;
use crate::transport::timeout::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptedFailure {
    /// `io::ErrorKind::TimedOut`, "socket deadline elapsed".
    Timeout,
    /// `io::ErrorKind::ConnectionRefused`, "refused by peer".
    Refused,
    InvalidState,
}

impl ScriptedFailure {
    fn error(self) -> TransportError {
        match self {
            ScriptedFailure::Timeout => TransportError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "socket deadline elapsed",
            )),
            ScriptedFailure::Refused => TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "refused by peer",
            )),
            ScriptedFailure::InvalidState => TransportError::InvalidState("scripted"),
        }
    }
}

/// In-memory connection answering with a fixed response.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedConnection {
    uri: Uri,
    request_headers: HeaderMap,
    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Option<Bytes>,
    failure: Option<(Operation, ScriptedFailure)>,
    sent: Arc<Mutex<Option<Bytes>>>,
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl ScriptedConnection {
    pub(crate) fn ok(body: &'static [u8]) -> Self {
        Self::with_response(StatusCode::OK, body)
    }

    pub(crate) fn with_response(status: StatusCode, body: &'static [u8]) -> Self {
        let mut response_headers = HeaderMap::new();
        response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE));
        Self {
            uri: Uri::from_static("http://scripted.test/services"),
            request_headers: HeaderMap::new(),
            status,
            response_headers,
            response_body: (!body.is_empty()).then(|| Bytes::from_static(body)),
            failure: None,
            sent: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing_on(mut self, operation: Operation, failure: ScriptedFailure) -> Self {
        self.failure = Some((operation, failure));
        self
    }

    /// Shared log of the operations invoked so far.
    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<Operation>>> {
        Arc::clone(&self.calls)
    }

    /// Shared slot holding the body passed to `send`.
    pub(crate) fn sent(&self) -> Arc<Mutex<Option<Bytes>>> {
        Arc::clone(&self.sent)
    }

    fn record(&mut self, operation: Operation) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(operation);
        match self.failure {
            Some((failing, failure)) if failing == operation => Err(failure.error()),
            _ => Ok(()),
        }
    }

    fn is_sent(&self) -> bool {
        self.sent.lock().unwrap().is_some()
    }
}

impl WebServiceConnection for ScriptedConnection {
    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    fn response_status(&self) -> Option<StatusCode> {
        self.is_sent().then_some(self.status)
    }

    fn response_headers(&self) -> Option<&HeaderMap> {
        self.is_sent().then_some(&self.response_headers)
    }

    fn add_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        self.record(Operation::AddRequestHeader)?;
        let name = axum::http::HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.into()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| TransportError::InvalidRequest(e.into()))?;
        self.request_headers.append(name, value);
        Ok(())
    }

    async fn send(&mut self, body: Bytes) -> Result<(), TransportError> {
        self.record(Operation::Send)?;
        *self.sent.lock().unwrap() = Some(body);
        Ok(())
    }

    async fn has_error(&mut self) -> Result<bool, TransportError> {
        self.record(Operation::HasError)?;
        Ok(self.status.is_client_error() || self.status.is_server_error())
    }

    async fn has_fault(&mut self) -> Result<bool, TransportError> {
        self.record(Operation::HasFault)?;
        Ok(self.status == StatusCode::INTERNAL_SERVER_ERROR
            && is_xml_content_type(&self.response_headers))
    }

    async fn error_message(&mut self) -> Result<String, TransportError> {
        self.record(Operation::ErrorMessage)?;
        Ok(self.status.to_string())
    }

    async fn receive(&mut self) -> Result<Option<Bytes>, TransportError> {
        self.record(Operation::Receive)?;
        Ok(self.response_body.clone())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.record(Operation::Close)?;
        Ok(())
    }
}

/// Sender handing out clones of a template connection.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedSender {
    template: ScriptedConnection,
}

impl ScriptedSender {
    pub(crate) fn new(template: ScriptedConnection) -> Self {
        Self { template }
    }
}

impl MessageSender for ScriptedSender {
    type Connection = ScriptedConnection;

    fn create_connection(&self, uri: &Uri) -> Result<ScriptedConnection, TransportError> {
        let mut connection = self.template.clone();
        connection.uri = uri.clone();
        Ok(connection)
    }
}
