//! XML document decoding.
//!
//! Responses are parsed into a small owned tree ([`XmlDocument`]) built over
//! the `quick_xml` streaming parser. The tree keeps element names, attributes
//! in document order, child elements and accumulated character data; it is
//! enough to inspect a web service response without pulling in a full DOM.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Decoded, ResponseDecoder, FALLBACK_CODE, FALLBACK_MESSAGE};
use crate::errors::RequestError;

/// A single element in a parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Concatenated character data directly inside this element.
    pub text: String,
}

impl XmlElement {
    /// Returns the value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// A fully parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    /// Parses a complete document. Exactly one root element is required.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let mut reader = Reader::from_str(raw);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => {
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| RequestError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&text.unescape().map_err(xml_error)?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(parent) = stack.last_mut() {
                        parent
                            .text
                            .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, doctypes and processing
                // instructions carry no payload data.
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(RequestError::Xml("unclosed element".to_string()));
        }
        match root {
            Some(root) => Ok(Self { root }),
            None => Err(RequestError::Xml("document has no root element".to_string())),
        }
    }
}

fn xml_error(e: impl std::fmt::Display) -> RequestError {
    RequestError::Xml(e.to_string())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), RequestError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(RequestError::Xml("multiple root elements".to_string())),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, RequestError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Decodes the response as an XML document.
///
/// The document is a business error when the root element carries
/// `error="1"`; code and message are then read from the root's
/// `error_code`/`error_message` attributes with the documented fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl ResponseDecoder for XmlDecoder {
    type Payload = XmlDocument;

    fn decode(&self, raw: &str) -> Result<Decoded<XmlDocument>, RequestError> {
        let document = XmlDocument::parse(raw)?;

        if document.root.attribute("error") == Some("1") {
            let code = document
                .root
                .attribute("error_code")
                .unwrap_or(FALLBACK_CODE)
                .to_string();
            let message = document
                .root
                .attribute("error_message")
                .unwrap_or(FALLBACK_MESSAGE)
                .to_string();
            return Ok(Decoded::BusinessError { code, message });
        }

        Ok(Decoded::Success(document))
    }
}
