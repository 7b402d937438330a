/// Metainfo-to-preview pipeline
///
/// `Previewer::open_descriptor` runs every stage needed to go from a
/// metainfo path to a `PreviewState`:
///
/// 1. Read the file (async)
/// 2. Parse name/summary/screenshot/branding
/// 3. In parallel: look for the icon, and fetch + crop the screenshot
///
/// It is all-or-nothing: any fatal error aborts the open and no partial
/// preview is produced. A missing icon is not fatal.

use std::path::{Path, PathBuf};

use crate::error::PreviewError;
use crate::metainfo::icon::resolve_icon_async;
use crate::metainfo::{ColorScheme, Descriptor};
use crate::screenshot::processor::process_screenshot_async;
use crate::screenshot::{HttpFetcher, ScreenshotSource};
use crate::state::config::PreviewConfig;
use crate::state::data::{PixelBuffer, PreviewState};
use crate::state::session::OpenTicket;

#[derive(Debug, Clone)]
pub struct Previewer<S = HttpFetcher> {
    source: S,
    config: PreviewConfig,
}

impl Previewer<HttpFetcher> {
    /// Previewer that downloads screenshots over HTTP
    pub fn new(config: PreviewConfig) -> Result<Self, PreviewError> {
        let source = HttpFetcher::new(&config)?;
        Ok(Self { source, config })
    }
}

impl<S: ScreenshotSource> Previewer<S> {
    pub fn with_source(source: S, config: PreviewConfig) -> Self {
        Self { source, config }
    }

    /// Build the preview for the metainfo file at `path`
    ///
    /// Returns `PreviewError::Superseded` as soon as `ticket` stops being
    /// current, so a stale open never does more work than it has to.
    pub async fn open_descriptor(
        &self,
        path: PathBuf,
        ticket: &OpenTicket,
        scheme: ColorScheme,
    ) -> Result<PreviewState, PreviewError> {
        let descriptor = read_descriptor(&path).await?;
        ensure_current(ticket)?;

        let subtitle = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let url = descriptor
            .screenshot_url
            .clone()
            .ok_or(PreviewError::MissingScreenshot)?;

        let (icon_path, screenshot) = tokio::join!(
            resolve_icon_async(path.clone(), self.config.max_icon_search_depth),
            self.fetch_screenshot(&url, ticket),
        );
        let screenshot = screenshot?;
        ensure_current(ticket)?;

        Ok(PreviewState {
            title: descriptor.name,
            subtitle,
            summary: descriptor.summary,
            icon_path,
            screenshot,
            color_scheme: scheme,
            branding: descriptor.branding,
        })
    }

    /// Download the screenshot and turn it into a cropped RGBA buffer
    pub async fn fetch_screenshot(
        &self,
        url: &str,
        ticket: &OpenTicket,
    ) -> Result<PixelBuffer, PreviewError> {
        let bytes = self.source.fetch(url).await?;
        // No point decoding for an open nobody is waiting on
        ensure_current(ticket)?;
        process_screenshot_async(bytes).await
    }
}

/// Read and parse a metainfo file
pub async fn read_descriptor(path: &Path) -> Result<Descriptor, PreviewError> {
    let contents = tokio::fs::read(path).await.map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.is_empty() {
        return Err(PreviewError::EmptyContents);
    }

    let descriptor = Descriptor::parse(&contents)?;
    tracing::debug!(path = %path.display(), name = %descriptor.name, "parsed metainfo");
    Ok(descriptor)
}

fn ensure_current(ticket: &OpenTicket) -> Result<(), PreviewError> {
    if ticket.is_current() {
        Ok(())
    } else {
        Err(PreviewError::Superseded)
    }
}
