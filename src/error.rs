/// Error types for the preview pipeline
///
/// Every stage of opening a metainfo file reports failures through
/// `PreviewError`. A missing icon is not an error: the icon resolver
/// returns `None` and the card is rendered without one.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning metainfo XML into a `Descriptor`
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// The document has no root element at all
    #[error("document has no root element")]
    NoRoot,

    /// A required element (`name`, `summary`) is absent
    #[error("missing required <{0}> element")]
    MissingElement(&'static str),

    /// `<branding>` is present but lacks one of the two scheme colors
    #[error("<branding> has no color for the {0} scheme")]
    MissingBrandingColor(&'static str),
}

/// Everything that can abort an open-file operation
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read successfully but contained zero bytes
    #[error("file is empty")]
    EmptyContents,

    #[error("invalid metainfo: {0}")]
    Parse(#[from] ParseError),

    /// The descriptor declares no `screenshots/screenshot/image`
    #[error("metainfo declares no screenshot")]
    MissingScreenshot,

    #[error("invalid screenshot URL {url:?}")]
    InvalidUrl { url: String },

    /// The server answered with something other than 200
    #[error("{status} - {reason}")]
    Fetch { status: u16, reason: String },

    /// DNS, connection, TLS, timeout or body read failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode screenshot: {0}")]
    Decode(#[from] image::ImageError),

    /// A newer open-file operation started while this one was in flight
    #[error("superseded by a newer open request")]
    Superseded,

    #[error("background task failed: {0}")]
    Task(String),
}

impl PreviewError {
    /// HTTP status of a rejected screenshot request, if that is what failed
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PreviewError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for PreviewError {
    fn from(e: tokio::task::JoinError) -> Self {
        PreviewError::Task(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message_matches_status_line() {
        let err = PreviewError::Fetch {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "404 - Not Found");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(PreviewError::EmptyContents.status_code(), None);
    }

    #[test]
    fn test_parse_error_wraps_into_preview_error() {
        let err: PreviewError = ParseError::MissingElement("summary").into();
        assert!(matches!(
            err,
            PreviewError::Parse(ParseError::MissingElement("summary"))
        ));
        assert_eq!(err.to_string(), "invalid metainfo: missing required <summary> element");
    }
}
