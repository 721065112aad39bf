//! Client-side message transport.
//!
//! # Data Flow
//! ```text
//! SoapClient
//!     → TimeoutClassifyingConnection (socket timeout → connect/read timeout)
//!     → MessageLoggingConnection (request/response records)
//!     → HttpConnection (TCP + HTTP/1.1, connect and read deadlines)
//!     → endpoint
//! ```
//!
//! # Design Decisions
//! - Each exchange gets its own connection; nothing is pooled
//! - Decorators wrap the connection, not the client, so every step of the
//!   exchange is observed individually
//! - Classification sits outermost so it also sees errors raised inside
//!   the logging layer's inner calls

pub mod connection;
pub mod error;
pub mod http;
pub mod logging;
pub mod timeout;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{MessageSender, WebServiceConnection, SOAP_HTTP_METHOD};
pub use error::{TimeoutPhase, TransportError};
pub use http::{HttpConnection, HttpMessageSender, HttpTransportConfig};
pub use logging::{MessageLoggingConnection, MessageLoggingSender};
pub use timeout::{Operation, TimeoutClassifyingConnection, TimeoutClassifyingSender};

use crate::config::ClientConfig;

/// The sender stack used by the country client.
pub type DefaultSender = TimeoutClassifyingSender<MessageLoggingSender<HttpMessageSender>>;

/// Build the default sender stack from client configuration.
pub fn default_sender(config: &ClientConfig) -> DefaultSender {
    let http = HttpMessageSender::new(HttpTransportConfig::from(config));
    TimeoutClassifyingSender::new(MessageLoggingSender::new(http, config.log_response_body))
}
