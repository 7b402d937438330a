/// Metainfo reading module
///
/// This module handles:
/// - Parsing the metainfo XML into a `Descriptor`
/// - Extracting light/dark branding colors
/// - Locating the app icon next to the metainfo file

mod tree;

pub mod branding;
pub mod descriptor;
pub mod icon;

pub use branding::{Branding, ColorScheme, ColorString};
pub use descriptor::Descriptor;
