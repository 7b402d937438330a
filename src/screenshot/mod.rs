/// Screenshot module
///
/// This module handles:
/// - Downloading the screenshot declared by the metainfo file
/// - Decoding and cropping it into an RGBA pixel buffer

pub mod fetch;
pub mod processor;

pub use fetch::{HttpFetcher, ScreenshotSource};
