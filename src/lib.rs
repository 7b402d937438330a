//! Preview an AppStream metainfo file as an app card.
//!
//! The library holds the whole metainfo-to-preview pipeline; the binary is
//! a thin iced front end that calls into it.
//!
//! - `metainfo` parses the XML, extracts branding and finds the icon
//! - `screenshot` downloads and crops the screenshot
//! - `preview` chains the stages into a `PreviewState`
//! - `state` holds the session state machine and configuration

pub mod error;
pub mod metainfo;
pub mod preview;
pub mod screenshot;
pub mod state;

pub use error::{ParseError, PreviewError};
pub use preview::Previewer;
