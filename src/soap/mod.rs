//! SOAP 1.1 message handling.
//!
//! # Data Flow
//! ```text
//! Inbound bytes
//!     → xml.rs (namespace-aware parse into an owned element tree)
//!     → envelope.rs (locate Envelope/Body, expose the payload element)
//!     → payload.rs (typed getCountryRequest / getCountryResponse)
//!     → fault.rs (SOAP-ENV:Fault detection and decoding)
//!
//! Outbound:
//!     payload.rs / fault.rs write into envelope.rs::write_envelope
//! ```
//!
//! # Design Decisions
//! - No data binding or code generation: payloads are read and written by hand
//! - Element matching is by local name; the payload namespace is checked at dispatch
//! - Text content is kept verbatim (no trimming)

pub mod envelope;
pub mod fault;
pub mod payload;
pub mod xml;

pub use envelope::{write_envelope, SoapEnvelope};
pub use fault::{FaultCode, SoapFault};
pub use payload::{decode, encode, GetCountryRequest, GetCountryResponse, SoapPayload};
pub use xml::XmlElement;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace of the country service payloads.
pub const COUNTRY_NS: &str = "http://example.com/springwsserverdemo/services/country";

/// Content type used for SOAP 1.1 over HTTP.
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Errors raised while reading or writing SOAP messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SoapError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("missing SOAP Envelope")]
    MissingEnvelope,

    #[error("missing SOAP Body")]
    MissingBody,

    #[error("SOAP Body has no payload element")]
    EmptyBody,

    #[error("unexpected payload element '{found}', expected '{expected}'")]
    UnexpectedPayload {
        expected: &'static str,
        found: String,
    },

    #[error("missing element '{0}'")]
    MissingElement(&'static str),

    #[error("invalid value for '{element}': {reason}")]
    InvalidValue {
        element: &'static str,
        reason: String,
    },

    #[error("failed to write XML: {0}")]
    Write(String),
}

impl SoapError {
    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        SoapError::Write(err.to_string())
    }
}
