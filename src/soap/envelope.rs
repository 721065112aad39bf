//! SOAP 1.1 envelope reading and writing.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::soap::fault::SoapFault;
use crate::soap::xml::XmlElement;
use crate::soap::{SoapError, SOAP_ENV_NS};

const ENV_PREFIX: &str = "SOAP-ENV";

/// A parsed envelope. Only the Body is retained; headers are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapEnvelope {
    body: XmlElement,
}

impl SoapEnvelope {
    pub fn parse(xml: &[u8]) -> Result<Self, SoapError> {
        let root = XmlElement::parse(xml)?;
        if !root.is(SOAP_ENV_NS, "Envelope") {
            return Err(SoapError::MissingEnvelope);
        }

        let body = root
            .children
            .into_iter()
            .find(|c| c.is(SOAP_ENV_NS, "Body"))
            .ok_or(SoapError::MissingBody)?;

        Ok(Self { body })
    }

    /// The first element inside the Body.
    pub fn payload(&self) -> Result<&XmlElement, SoapError> {
        self.body.children.first().ok_or(SoapError::EmptyBody)
    }

    /// The fault carried by this envelope, if the payload is a `SOAP-ENV:Fault`.
    pub fn fault(&self) -> Option<SoapFault> {
        self.payload().ok().and_then(SoapFault::from_element)
    }
}

/// Write a complete envelope, delegating the Body contents to `write_body`.
pub fn write_envelope<F>(write_body: F) -> Result<String, SoapError>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> Result<(), SoapError>,
{
    let mut writer = Writer::new(Vec::new());
    let envelope = format!("{ENV_PREFIX}:Envelope");
    let body = format!("{ENV_PREFIX}:Body");
    let xmlns = format!("xmlns:{ENV_PREFIX}");

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::Start(
            BytesStart::new(envelope.as_str()).with_attributes([(xmlns.as_str(), SOAP_ENV_NS)]),
        ))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::Empty(BytesStart::new(format!("{ENV_PREFIX}:Header"))))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::Start(BytesStart::new(body.as_str())))
        .map_err(SoapError::write)?;

    write_body(&mut writer)?;

    writer
        .write_event(Event::End(BytesEnd::new(body.as_str())))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::End(BytesEnd::new(envelope.as_str())))
        .map_err(SoapError::write)?;

    String::from_utf8(writer.into_inner()).map_err(SoapError::write)
}

/// Write `<name>text</name>` with the text escaped.
pub fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SoapError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(SoapError::write)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(SoapError::write)?;
    Ok(())
}

/// Qualified name for the envelope prefix, e.g. `SOAP-ENV:Client`.
pub(crate) fn env_qualified(local: &str) -> String {
    format!("{ENV_PREFIX}:{local}")
}
