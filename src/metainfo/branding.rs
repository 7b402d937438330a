/// Branding colors and color scheme handling
///
/// A metainfo file may declare a `<branding>` block with one color per
/// color scheme:
///
/// ```xml
/// <branding>
///   <color type="primary" scheme_preference="light">#ff00ff</color>
///   <color type="primary" scheme_preference="dark">#993d3d</color>
/// </branding>
/// ```
///
/// The colors are opaque CSS literals; we never interpret them here.

use std::fmt;

use super::tree::Element;
use crate::error::ParseError;

/// A CSS color literal, e.g. `#62a0ea` or `rebeccapurple`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorString(String);

impl ColorString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The active light/dark display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// The value used by `scheme_preference` attributes
    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }
}

/// Light/dark color pair from the `<branding>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub light: ColorString,
    pub dark: ColorString,
}

impl Branding {
    pub fn color_for(&self, scheme: ColorScheme) -> &ColorString {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }
}

/// Extract the branding pair from a parsed metainfo root
///
/// No `<branding>` element means no branding. A `<branding>` element that
/// lacks either scheme's color is rejected.
pub(crate) fn extract_branding(root: &Element) -> Result<Option<Branding>, ParseError> {
    let Some(branding) = root.child("branding") else {
        return Ok(None);
    };

    let light = scheme_color(branding, ColorScheme::Light)
        .ok_or(ParseError::MissingBrandingColor("light"))?;
    let dark = scheme_color(branding, ColorScheme::Dark)
        .ok_or(ParseError::MissingBrandingColor("dark"))?;

    Ok(Some(Branding { light, dark }))
}

fn scheme_color(branding: &Element, scheme: ColorScheme) -> Option<ColorString> {
    branding
        .children_named("color")
        .find(|c| c.attribute("scheme_preference") == Some(scheme.as_str()))
        .map(|c| c.text.trim())
        .filter(|text| !text.is_empty())
        .map(ColorString::new)
}
