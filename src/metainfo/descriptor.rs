/// Parsed metainfo document
///
/// Only the handful of fields the preview card needs are read:
///
/// - `name` and `summary` (required)
/// - `screenshots/screenshot/image` (first one only)
/// - `branding/color[@scheme_preference]` (optional)

use super::branding::{extract_branding, Branding};
use super::tree::{parse_document, Element};
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub summary: String,
    /// URL of the first screenshot image, if any
    pub screenshot_url: Option<String>,
    pub branding: Option<Branding>,
}

impl Descriptor {
    /// Parse raw metainfo bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let xml = std::str::from_utf8(bytes).map_err(|e| ParseError::Malformed {
            position: e.valid_up_to() as u64,
            message: e.to_string(),
        })?;
        Self::from_xml(xml)
    }

    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        let root = parse_document(xml)?;

        let name = untranslated_text(&root, "name").ok_or(ParseError::MissingElement("name"))?;
        let summary =
            untranslated_text(&root, "summary").ok_or(ParseError::MissingElement("summary"))?;

        let screenshot_url = root
            .find_path(&["screenshots", "screenshot", "image"])
            .map(|image| image.text.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let branding = extract_branding(&root)?;

        Ok(Descriptor {
            name,
            summary,
            screenshot_url,
            branding,
        })
    }
}

/// Text of the first `tag` child without `xml:lang`, else of the first `tag` child
fn untranslated_text(root: &Element, tag: &str) -> Option<String> {
    root.children_named(tag)
        .find(|e| e.attribute("xml:lang").is_none())
        .or_else(|| root.child(tag))
        .map(|e| e.text.clone())
}
