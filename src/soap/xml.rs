//! Minimal owned XML element tree built on `quick-xml`'s namespace reader.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::soap::SoapError;

/// Deepest element nesting accepted by [`XmlElement::parse`]. Element trees
/// are cloned, compared and dropped recursively, so depth must stay bounded.
pub const MAX_DEPTH: usize = 64;

/// An element with its resolved namespace, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub local_name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(xml: &[u8]) -> Result<Self, SoapError> {
        let text = std::str::from_utf8(xml).map_err(|e| SoapError::Malformed(e.to_string()))?;
        let mut reader = NsReader::from_str(text);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            let (ns, event) = reader
                .read_resolved_event()
                .map_err(|e| SoapError::Malformed(e.to_string()))?;

            match event {
                Event::Start(start) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(SoapError::Malformed("nesting too deep".into()));
                    }
                    stack.push(XmlElement {
                        namespace: resolve(ns)?,
                        local_name: String::from_utf8_lossy(start.local_name().as_ref())
                            .into_owned(),
                        ..Default::default()
                    });
                }
                Event::Empty(start) => {
                    let element = XmlElement {
                        namespace: resolve(ns)?,
                        local_name: String::from_utf8_lossy(start.local_name().as_ref())
                            .into_owned(),
                        ..Default::default()
                    };
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SoapError::Malformed("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(t) => {
                    let value = t.unescape().map_err(|e| SoapError::Malformed(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&value);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(SoapError::Malformed("unexpected end of document".into()));
        }
        root.ok_or_else(|| SoapError::Malformed("document has no root element".into()))
    }

    /// First direct child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.local_name == local_name)
    }

    /// Text of a required child element.
    pub fn child_text(&self, local_name: &'static str) -> Result<&str, SoapError> {
        self.child(local_name)
            .map(|c| c.text.as_str())
            .ok_or(SoapError::MissingElement(local_name))
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }
}

fn resolve(ns: ResolveResult<'_>) -> Result<Option<String>, SoapError> {
    match ns {
        ResolveResult::Bound(namespace) => {
            Ok(Some(String::from_utf8_lossy(namespace.as_ref()).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(SoapError::Malformed(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), SoapError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(SoapError::Malformed("multiple root elements".into())),
    }
    Ok(())
}
