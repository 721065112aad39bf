//! SOAP client.
//!
//! # Data Flow
//! ```text
//! CountryClient::get_country(name)
//!     → SoapClient::send_and_receive (encode, drive the connection, decode)
//!     → MessageSender::create_connection (decorated transport stack)
//! ```

pub mod country;
pub mod template;

pub use country::CountryClient;
pub use template::SoapClient;

use crate::soap::{SoapError, SoapFault};
use crate::transport::{TimeoutPhase, TransportError};

/// Errors surfaced to callers of the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a SOAP fault.
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    /// HTTP error status without a fault body.
    #[error("HTTP error: {0}")]
    Status(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("invalid SOAP message: {0}")]
    Soap(#[from] SoapError),

    #[error("invalid endpoint '{0}'")]
    InvalidUri(String),
}

impl ClientError {
    /// Phase of a classified transport timeout.
    pub fn timeout_phase(&self) -> Option<TimeoutPhase> {
        match self {
            ClientError::Transport(e) => e.timeout_phase(),
            _ => None,
        }
    }
}
