/// Shared data structures for the preview
///
/// These structs represent the data model that flows between
/// the preview pipeline and the UI layer.

use std::fmt;
use std::path::PathBuf;

use crate::metainfo::{Branding, ColorScheme, ColorString};

/// CSS class of the card the branding color is applied to
pub const CARD_STYLE_CLASS: &str = "main-card";

/// A decoded, cropped screenshot ready for a raster display primitive
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, always `width * 4`
    pub stride: usize,
    /// Row-major RGBA8
    pub pixels: Vec<u8>,
}

impl fmt::Debug for PixelBuffer {
    // Pixel data is far too large to be useful in logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// Background of the preview card for a given color scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBackground {
    Branded(ColorString),
    /// The metainfo file declares no branding colors
    NoBranding,
}

impl CardBackground {
    pub fn color(&self) -> Option<&ColorString> {
        match self {
            CardBackground::Branded(color) => Some(color),
            CardBackground::NoBranding => None,
        }
    }
}

impl fmt::Display for CardBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardBackground::Branded(color) => write!(f, "{}", color),
            CardBackground::NoBranding => f.write_str("no branding"),
        }
    }
}

/// Request to paint a component class with a color
///
/// Issued by the preview, fulfilled by whatever draws the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylingRequest {
    pub class: &'static str,
    pub color: ColorString,
}

impl StylingRequest {
    /// Render as a CSS rule, e.g. `.main-card { background-color: #fff;}`
    pub fn to_css(&self) -> String {
        format!(".{} {{ background-color: {};}}", self.class, self.color)
    }
}

/// Everything the UI needs to draw the preview card
///
/// Built in one piece by `Previewer::open_descriptor` and replaced in one
/// piece when another file is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewState {
    /// Component name from `<name>`
    pub title: String,
    /// File name of the opened metainfo file
    pub subtitle: String,
    /// One-line description from `<summary>`
    pub summary: String,
    /// Icon found next to the metainfo file (None if not found)
    pub icon_path: Option<PathBuf>,
    /// Cropped screenshot
    pub screenshot: PixelBuffer,
    /// Scheme the card is currently shown in
    pub color_scheme: ColorScheme,
    /// Light/dark card colors, if declared
    pub branding: Option<Branding>,
}

impl PreviewState {
    /// Card background for `scheme`, from the branding already held
    ///
    /// Pure: nothing is re-read or re-fetched.
    pub fn recompute_background_color(&self, scheme: ColorScheme) -> CardBackground {
        match &self.branding {
            Some(branding) => CardBackground::Branded(branding.color_for(scheme).clone()),
            None => CardBackground::NoBranding,
        }
    }

    /// Background for the scheme the card is currently shown in
    pub fn background_color(&self) -> CardBackground {
        self.recompute_background_color(self.color_scheme)
    }

    /// Styling request for the card, or None without branding
    pub fn styling_request(&self, scheme: ColorScheme) -> Option<StylingRequest> {
        self.branding.as_ref().map(|branding| StylingRequest {
            class: CARD_STYLE_CLASS,
            color: branding.color_for(scheme).clone(),
        })
    }
}
