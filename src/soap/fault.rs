//! SOAP 1.1 faults.

use std::fmt;

use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::soap::envelope::{env_qualified, write_envelope, write_text_element};
use crate::soap::xml::XmlElement;
use crate::soap::{SoapError, SOAP_ENV_NS};

/// The `faultcode` of a SOAP 1.1 fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCode {
    /// The request was malformed or invalid.
    Client,
    /// The server failed to process a valid request.
    Server,
    Other(String),
}

impl FaultCode {
    fn parse(raw: &str) -> Self {
        let local = raw.rsplit(':').next().unwrap_or(raw).trim();
        match local {
            "Client" => FaultCode::Client,
            "Server" => FaultCode::Server,
            _ => FaultCode::Other(raw.trim().to_string()),
        }
    }

    fn qualified(&self) -> String {
        match self {
            FaultCode::Client => env_qualified("Client"),
            FaultCode::Server => env_qualified("Server"),
            FaultCode::Other(code) => code.clone(),
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultCode::Client => f.write_str("Client"),
            FaultCode::Server => f.write_str("Server"),
            FaultCode::Other(code) => f.write_str(code),
        }
    }
}

/// A SOAP fault as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub code: FaultCode,
    pub message: String,
}

impl SoapFault {
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Client,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            code: FaultCode::Server,
            message: message.into(),
        }
    }

    /// Decode a `SOAP-ENV:Fault` element. Returns `None` for any other element.
    pub fn from_element(element: &XmlElement) -> Option<Self> {
        if !element.is(SOAP_ENV_NS, "Fault") {
            return None;
        }
        let code = element
            .child("faultcode")
            .map(|c| FaultCode::parse(&c.text))
            .unwrap_or(FaultCode::Server);
        let message = element
            .child("faultstring")
            .map(|c| c.text.clone())
            .unwrap_or_default();
        Some(Self { code, message })
    }

    /// Serialize this fault as a complete envelope.
    pub fn to_envelope(&self) -> Result<String, SoapError> {
        let fault = env_qualified("Fault");
        write_envelope(|w| {
            w.write_event(Event::Start(BytesStart::new(fault.as_str())))
                .map_err(SoapError::write)?;
            write_text_element(w, "faultcode", &self.code.qualified())?;
            write_text_element(w, "faultstring", &self.message)?;
            w.write_event(Event::End(BytesEnd::new(fault.as_str())))
                .map_err(SoapError::write)?;
            Ok(())
        })
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
