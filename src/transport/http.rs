//! HTTP/1.1 connections over plain TCP.
//!
//! # Responsibilities
//! - Resolve the endpoint URI into host, port and request target
//! - Connect, handshake and queue the request under the connect deadline
//! - Await the response head and body under the read deadline
//!
//! hyper writes the request while the response future is polled, so the
//! request bytes go out under the read deadline. A peer that stops reading
//! mid-request surfaces as a read timeout.
//!
//! Deadline expiry is reported as `io::ErrorKind::TimedOut`, whichever
//! deadline fired. Telling the two apart is left to
//! [`crate::transport::timeout`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::{response, HeaderMap, Method, Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::transport::connection::{is_xml_content_type, MessageSender, WebServiceConnection};
use crate::transport::error::TransportError;

type ResponseFuture = Pin<Box<dyn Future<Output = hyper::Result<Response<Incoming>>> + Send>>;

/// Deadlines applied by [`HttpMessageSender`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(60_000),
            read_timeout: Duration::from_millis(60_000),
        }
    }
}

impl From<&ClientConfig> for HttpTransportConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }
}

/// Creates one fresh TCP connection per exchange.
#[derive(Debug, Clone, Default)]
pub struct HttpMessageSender {
    config: HttpTransportConfig,
}

impl HttpMessageSender {
    pub fn new(config: HttpTransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

impl MessageSender for HttpMessageSender {
    type Connection = HttpConnection;

    fn create_connection(&self, uri: &Uri) -> Result<HttpConnection, TransportError> {
        HttpConnection::new(uri.clone(), self.config)
    }
}

/// A single HTTP exchange. Nothing touches the network until [`send`](WebServiceConnection::send).
pub struct HttpConnection {
    uri: Uri,
    host: String,
    port: u16,
    config: HttpTransportConfig,
    request_headers: HeaderMap,
    sender: Option<SendRequest<Body>>,
    pending: Option<ResponseFuture>,
    head: Option<response::Parts>,
    body: Option<Incoming>,
}

impl HttpConnection {
    fn new(uri: Uri, config: HttpTransportConfig) -> Result<Self, TransportError> {
        let invalid = |reason: &str| TransportError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        if uri.scheme_str() != Some("http") {
            return Err(invalid("only the http scheme is supported"));
        }
        let host = uri.host().ok_or_else(|| invalid("missing host"))?.to_string();
        let port = uri.port_u16().unwrap_or(80);

        let mut request_headers = HeaderMap::new();
        let authority = uri.authority().map(|a| a.as_str()).unwrap_or(host.as_str());
        let host_header = HeaderValue::from_str(authority).map_err(|_| invalid("bad authority"))?;
        request_headers.insert(HOST, host_header);

        Ok(Self {
            uri,
            host,
            port,
            config,
            request_headers,
            sender: None,
            pending: None,
            head: None,
            body: None,
        })
    }

    fn request_target(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/")
    }

    /// Wait for the response head, if it has not arrived yet.
    async fn await_head(&mut self) -> Result<&response::Parts, TransportError> {
        if self.head.is_none() {
            let pending = self
                .pending
                .take()
                .ok_or(TransportError::InvalidState("no request has been sent"))?;

            let response = match timeout(self.config.read_timeout, pending).await {
                Ok(result) => result?,
                Err(_) => return Err(TransportError::socket_timeout("read timed out")),
            };

            let (parts, body) = response.into_parts();
            tracing::debug!(uri = %self.uri, status = %parts.status, "Response head received");
            self.head = Some(parts);
            self.body = Some(body);
        }

        self.head
            .as_ref()
            .ok_or(TransportError::InvalidState("no response head"))
    }
}

async fn connect(host: String, port: u16, peer: String) -> Result<SendRequest<Body>, TransportError> {
    let stream = TcpStream::connect((host.as_str(), port)).await?;
    stream.set_nodelay(true)?;

    let (mut sender, conn) = http1::handshake::<_, Body>(TokioIo::new(stream)).await?;
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(uri = %peer, error = %e, "HTTP connection closed with error");
        }
    });

    sender.ready().await?;
    Ok(sender)
}

impl WebServiceConnection for HttpConnection {
    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    fn response_status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|h| h.status)
    }

    fn response_headers(&self) -> Option<&HeaderMap> {
        self.head.as_ref().map(|h| &h.headers)
    }

    fn add_request_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.into()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| TransportError::InvalidRequest(e.into()))?;
        self.request_headers.append(name, value);
        Ok(())
    }

    async fn send(&mut self, body: Bytes) -> Result<(), TransportError> {
        if self.sender.is_some() {
            return Err(TransportError::InvalidState("request already sent"));
        }

        let connect = connect(self.host.clone(), self.port, self.uri.to_string());
        let mut sender = match timeout(self.config.connect_timeout, connect).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::socket_timeout("connect timed out")),
        };

        let mut request = Request::builder()
            .method(Method::POST)
            .uri(self.request_target())
            .body(Body::from(body))?;
        *request.headers_mut() = self.request_headers.clone();

        // Queued only; the write happens when `await_head` polls this.
        self.pending = Some(Box::pin(sender.send_request(request)));
        self.sender = Some(sender);
        Ok(())
    }

    async fn has_error(&mut self) -> Result<bool, TransportError> {
        let status = self.await_head().await?.status;
        Ok(status.is_client_error() || status.is_server_error())
    }

    async fn has_fault(&mut self) -> Result<bool, TransportError> {
        let head = self.await_head().await?;
        Ok(head.status == StatusCode::INTERNAL_SERVER_ERROR && is_xml_content_type(&head.headers))
    }

    async fn error_message(&mut self) -> Result<String, TransportError> {
        let status = self.await_head().await?.status;
        Ok(match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        })
    }

    async fn receive(&mut self) -> Result<Option<Bytes>, TransportError> {
        self.await_head().await?;
        let Some(body) = self.body.take() else {
            return Err(TransportError::InvalidState("response body already consumed"));
        };

        let bytes = match timeout(
            self.config.read_timeout,
            axum::body::to_bytes(Body::new(body), usize::MAX),
        )
        .await
        {
            Ok(result) => result.map_err(TransportError::Body)?,
            Err(_) => return Err(TransportError::socket_timeout("read timed out")),
        };

        Ok((!bytes.is_empty()).then_some(bytes))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.pending = None;
        self.body = None;
        self.sender = None;
        Ok(())
    }
}
