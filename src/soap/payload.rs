//! Country service payloads and the generic payload codec.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::country::{Country, Currency};
use crate::soap::envelope::{write_envelope, write_text_element, SoapEnvelope};
use crate::soap::xml::XmlElement;
use crate::soap::{SoapError, COUNTRY_NS};

const PREFIX: &str = "tns";

/// A message that travels as the single child of a SOAP Body.
pub trait SoapPayload: Sized {
    /// Local name of the payload root element.
    const ELEMENT: &'static str;

    /// Write the payload's children. The root element is written by [`encode`].
    fn write_children(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), SoapError>;

    /// Read the payload from its root element.
    fn read(element: &XmlElement) -> Result<Self, SoapError>;
}

/// Wrap a payload in a complete SOAP envelope.
pub fn encode<P: SoapPayload>(payload: &P) -> Result<String, SoapError> {
    let root = qualified(P::ELEMENT);
    let xmlns = format!("xmlns:{PREFIX}");
    write_envelope(|w| {
        w.write_event(Event::Start(
            BytesStart::new(root.as_str()).with_attributes([(xmlns.as_str(), COUNTRY_NS)]),
        ))
        .map_err(SoapError::write)?;
        payload.write_children(w)?;
        w.write_event(Event::End(BytesEnd::new(root.as_str())))
            .map_err(SoapError::write)?;
        Ok(())
    })
}

/// Parse an envelope and read the expected payload from its Body.
pub fn decode<P: SoapPayload>(xml: &[u8]) -> Result<P, SoapError> {
    let envelope = SoapEnvelope::parse(xml)?;
    read_payload(envelope.payload()?)
}

/// Read a payload element, checking its qualified name first.
pub fn read_payload<P: SoapPayload>(element: &XmlElement) -> Result<P, SoapError> {
    if !element.is(COUNTRY_NS, P::ELEMENT) {
        return Err(SoapError::UnexpectedPayload {
            expected: P::ELEMENT,
            found: element.local_name.clone(),
        });
    }
    P::read(element)
}

fn qualified(local: &str) -> String {
    format!("{PREFIX}:{local}")
}

/// `getCountryRequest`: look up a country by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCountryRequest {
    pub name: String,
}

impl GetCountryRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SoapPayload for GetCountryRequest {
    const ELEMENT: &'static str = "getCountryRequest";

    fn write_children(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), SoapError> {
        write_text_element(writer, &qualified("name"), &self.name)
    }

    fn read(element: &XmlElement) -> Result<Self, SoapError> {
        Ok(Self {
            name: element.child_text("name")?.to_string(),
        })
    }
}

/// `getCountryResponse`: the matching country, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetCountryResponse {
    pub country: Option<Country>,
}

impl SoapPayload for GetCountryResponse {
    const ELEMENT: &'static str = "getCountryResponse";

    fn write_children(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), SoapError> {
        let Some(country) = &self.country else {
            return Ok(());
        };
        let element = qualified("country");
        writer
            .write_event(Event::Start(BytesStart::new(element.as_str())))
            .map_err(SoapError::write)?;
        write_text_element(writer, &qualified("name"), &country.name)?;
        write_text_element(writer, &qualified("population"), &country.population.to_string())?;
        write_text_element(writer, &qualified("capital"), &country.capital)?;
        write_text_element(writer, &qualified("currency"), country.currency.as_str())?;
        writer
            .write_event(Event::End(BytesEnd::new(element.as_str())))
            .map_err(SoapError::write)?;
        Ok(())
    }

    fn read(element: &XmlElement) -> Result<Self, SoapError> {
        let Some(country) = element.child("country") else {
            return Ok(Self { country: None });
        };

        let population = country.child_text("population")?;
        let population = population
            .trim()
            .parse::<u64>()
            .map_err(|e| SoapError::InvalidValue {
                element: "population",
                reason: format!("'{population}': {e}"),
            })?;
        let currency = country
            .child_text("currency")?
            .trim()
            .parse::<Currency>()
            .map_err(|e| SoapError::InvalidValue {
                element: "currency",
                reason: e.to_string(),
            })?;

        Ok(Self {
            country: Some(Country {
                name: country.child_text("name")?.to_string(),
                capital: country.child_text("capital")?.to_string(),
                currency,
                population,
            }),
        })
    }
}
