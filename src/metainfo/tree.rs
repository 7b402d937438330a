/// Minimal owned XML element tree
///
/// Metainfo files are small, so the whole document is read into a tree of
/// `Element`s with quick-xml and then queried with first-match lookups.
/// An element's `text` is only the character data that appears before its
/// first child element, which is all the metainfo fields ever need.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of tag names, taking the first match at every level
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }
}

/// Parse a UTF-8 XML document and return its root element
pub(crate) fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Malformed {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(&reader, "content after the root element"));
                }
                stack.push(open_element(&start, &reader)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(&reader, "content after the root element"));
                }
                let element = open_element(&start, &reader)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(&reader, "closing tag without an open element"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if stack.is_empty() {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(malformed(&reader, "text outside the root element"));
                    }
                    continue;
                }
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        let unescaped = text.unescape().map_err(|e| ParseError::Malformed {
                            position: reader.buffer_position() as u64,
                            message: e.to_string(),
                        })?;
                        current.text.push_str(&unescaped);
                    }
                }
            }
            Event::CData(data) => {
                if stack.is_empty() {
                    return Err(malformed(&reader, "text outside the root element"));
                }
                if let Some(current) = stack.last_mut() {
                    if current.children.is_empty() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(&reader, &format!("<{}> is never closed", open.name)));
    }
    root.ok_or(ParseError::NoRoot)
}

fn open_element(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, &e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(reader, &e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn malformed(reader: &Reader<&[u8]>, message: &str) -> ParseError {
    ParseError::Malformed {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}
