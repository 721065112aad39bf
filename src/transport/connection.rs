//! Connection and sender abstractions.
//!
//! A [`MessageSender`] creates one [`WebServiceConnection`] per exchange. The
//! connection exposes each step of the exchange as a separate operation so
//! decorators can observe or reclassify failures per step.

use std::future::Future;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};

use crate::transport::error::TransportError;

/// HTTP method used for every SOAP request.
pub const SOAP_HTTP_METHOD: &str = "POST";

/// One request/response exchange with a web service endpoint.
///
/// Operations are expected in order: headers, `send`, then any of the
/// response operations, then `close`.
pub trait WebServiceConnection: Send {
    /// Target URI of this connection.
    fn uri(&self) -> &Uri;

    /// Headers added so far.
    fn request_headers(&self) -> &HeaderMap;

    /// Status of the response, once its head has been received.
    fn response_status(&self) -> Option<StatusCode>;

    /// Headers of the response, once its head has been received.
    fn response_headers(&self) -> Option<&HeaderMap>;

    fn add_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;

    /// Open the connection and write the request.
    fn send(&mut self, body: Bytes) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Whether the response status signals an error (4xx or 5xx).
    fn has_error(&mut self) -> impl Future<Output = Result<bool, TransportError>> + Send;

    /// Whether the response carries a SOAP fault.
    fn has_fault(&mut self) -> impl Future<Output = Result<bool, TransportError>> + Send;

    /// Human readable description of an error status.
    fn error_message(&mut self) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Read the response body. `None` when the body is empty.
    fn receive(&mut self) -> impl Future<Output = Result<Option<Bytes>, TransportError>> + Send;

    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Factory for connections.
pub trait MessageSender: Send + Sync {
    type Connection: WebServiceConnection;

    fn create_connection(&self, uri: &Uri) -> Result<Self::Connection, TransportError>;
}

/// Whether a content type denotes an XML document.
pub(crate) fn is_xml_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("xml"))
        .unwrap_or(false)
}
