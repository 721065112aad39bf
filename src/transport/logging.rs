//! Request/response message logging.
//!
//! # Responsibilities
//! - Log method, URI, headers and body of every outbound request
//! - Log status and headers of every response, once
//! - Log the response body only when `log_response_body` is set
//!
//! # Design Decisions
//! - Pure pass-through: each inner operation runs exactly once, results untouched
//! - Request and response records go to separate targets so they can be
//!   filtered independently (`RUST_LOG=country_ws::message_log::response=off`)

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};
use tracing::Level;

use crate::transport::connection::{MessageSender, WebServiceConnection, SOAP_HTTP_METHOD};
use crate::transport::error::TransportError;

pub const REQUEST_LOG_TARGET: &str = "country_ws::message_log::request";
pub const RESPONSE_LOG_TARGET: &str = "country_ws::message_log::response";

/// Sender whose connections log the messages they carry.
#[derive(Debug, Clone)]
pub struct MessageLoggingSender<S> {
    inner: S,
    log_response_body: bool,
}

impl<S> MessageLoggingSender<S> {
    pub fn new(inner: S, log_response_body: bool) -> Self {
        Self {
            inner,
            log_response_body,
        }
    }
}

impl<S: MessageSender> MessageSender for MessageLoggingSender<S> {
    type Connection = MessageLoggingConnection<S::Connection>;

    fn create_connection(&self, uri: &Uri) -> Result<Self::Connection, TransportError> {
        Ok(MessageLoggingConnection::new(
            self.inner.create_connection(uri)?,
            self.log_response_body,
        ))
    }
}

#[derive(Debug)]
pub struct MessageLoggingConnection<C> {
    inner: C,
    log_response_body: bool,
    response_logged: bool,
}

impl<C: WebServiceConnection> MessageLoggingConnection<C> {
    pub fn new(inner: C, log_response_body: bool) -> Self {
        Self {
            inner,
            log_response_body,
            response_logged: false,
        }
    }

    fn log_request(&self, body: &Bytes) {
        if !tracing::enabled!(target: REQUEST_LOG_TARGET, Level::INFO) {
            return;
        }
        tracing::info!(
            target: REQUEST_LOG_TARGET,
            method = SOAP_HTTP_METHOD,
            uri = %self.inner.uri(),
            "Request to {} {}",
            SOAP_HTTP_METHOD,
            self.inner.uri()
        );
        tracing::info!(
            target: REQUEST_LOG_TARGET,
            headers = ?self.inner.request_headers(),
            "Request headers"
        );
        tracing::info!(
            target: REQUEST_LOG_TARGET,
            body = %String::from_utf8_lossy(body),
            "Request body"
        );
    }

    /// Log status and headers the first time the response head is available.
    fn log_response_head(&mut self) {
        if self.response_logged {
            return;
        }
        let Some(status) = self.inner.response_status() else {
            return;
        };
        self.response_logged = true;

        if !tracing::enabled!(target: RESPONSE_LOG_TARGET, Level::INFO) {
            return;
        }
        tracing::info!(target: RESPONSE_LOG_TARGET, status = %status, "Response status");
        let empty = HeaderMap::new();
        tracing::info!(
            target: RESPONSE_LOG_TARGET,
            headers = ?self.inner.response_headers().unwrap_or(&empty),
            "Response headers"
        );
    }

    fn log_response_body(&self, body: Option<&Bytes>) {
        if !self.log_response_body
            || !tracing::enabled!(target: RESPONSE_LOG_TARGET, Level::INFO)
        {
            return;
        }
        let body = body.map(|b| String::from_utf8_lossy(b)).unwrap_or_default();
        tracing::info!(target: RESPONSE_LOG_TARGET, body = %body, "Response body");
    }
}

impl<C: WebServiceConnection> WebServiceConnection for MessageLoggingConnection<C> {
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
        self.inner.add_request_header(name, value)
    }

    async fn send(&mut self, body: Bytes) -> Result<(), TransportError> {
        self.log_request(&body);
        self.inner.send(body).await
    }

    async fn has_error(&mut self) -> Result<bool, TransportError> {
        let result = self.inner.has_error().await;
        self.log_response_head();
        result
    }

    async fn has_fault(&mut self) -> Result<bool, TransportError> {
        let result = self.inner.has_fault().await;
        self.log_response_head();
        result
    }

    async fn error_message(&mut self) -> Result<String, TransportError> {
        let result = self.inner.error_message().await;
        self.log_response_head();
        result
    }

    async fn receive(&mut self) -> Result<Option<Bytes>, TransportError> {
        let result = self.inner.receive().await;
        self.log_response_head();
        if let Ok(body) = &result {
            self.log_response_body(body.as_ref());
        }
        result
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::{ScriptedConnection, ScriptedFailure};
    use crate::transport::timeout::Operation;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(Level::INFO)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    async fn exchange<C: WebServiceConnection>(conn: &mut C) -> Option<Bytes> {
        conn.add_request_header("SOAPAction", "\"urn:getCountry\"").unwrap();
        conn.send(Bytes::from_static(b"<getCountryRequest>Spain</getCountryRequest>"))
            .await
            .unwrap();
        assert!(!conn.has_error().await.unwrap());
        conn.receive().await.unwrap()
    }

    #[tokio::test]
    async fn logs_request_and_full_response() {
        let (captured, _guard) = capture();
        let mut conn =
            MessageLoggingConnection::new(ScriptedConnection::ok(b"<capital>Madrid</capital>"), true);

        let body = exchange(&mut conn).await;
        assert_eq!(body.unwrap(), "<capital>Madrid</capital>");

        let out = captured.contents();
        assert!(out.contains("Request to POST http://scripted.test/services"));
        assert!(out.contains("urn:getCountry"));
        assert!(out.contains("<getCountryRequest>Spain</getCountryRequest>"));
        assert!(out.contains("200 OK"));
        assert!(out.contains("text/xml"));
        assert!(out.contains("<capital>Madrid</capital>"));
        assert_eq!(out.matches("Response status").count(), 1);
    }

    #[tokio::test]
    async fn response_body_is_omitted_when_disabled() {
        let (captured, _guard) = capture();
        let mut conn = MessageLoggingConnection::new(
            ScriptedConnection::ok(b"<capital>Madrid</capital>"),
            false,
        );

        let body = exchange(&mut conn).await;
        assert_eq!(body.unwrap(), "<capital>Madrid</capital>");

        let out = captured.contents();
        assert!(out.contains("Response status"));
        assert!(out.contains("200 OK"));
        assert!(out.contains("Response headers"));
        assert!(out.contains("text/xml"));
        assert!(!out.contains("Madrid"));
        assert!(!out.contains("Response body"));
    }

    #[tokio::test]
    async fn forwards_each_operation_once_and_keeps_errors() {
        let _capture = capture();
        let scripted = ScriptedConnection::ok(b"<ok/>").failing_on(Operation::Receive, ScriptedFailure::Refused);
        let calls = scripted.calls();
        let sent = scripted.sent();
        let mut conn = MessageLoggingConnection::new(scripted, true);

        conn.add_request_header("SOAPAction", "\"\"").unwrap();
        conn.send(Bytes::from_static(b"<request/>")).await.unwrap();
        assert!(!conn.has_error().await.unwrap());
        let err = conn.receive().await.unwrap_err();
        assert!(matches!(err, TransportError::Io(ref e) if e.to_string() == "refused by peer"));
        conn.close().await.unwrap();

        assert_eq!(sent.lock().unwrap().as_deref(), Some(&b"<request/>"[..]));
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
    }
}
