/// Screenshot download
///
/// A single GET per open-file operation, no retries. Anything other than
/// `200 OK` is reported as `PreviewError::Fetch` with the status line so the
/// caller can show it.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::PreviewError;
use crate::state::config::PreviewConfig;

/// Where screenshot bytes come from
///
/// The HTTP client is the only production implementation; tests plug in
/// sources that answer on demand.
pub trait ScreenshotSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, PreviewError>> + Send;
}

/// Fetches screenshots over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &PreviewConfig) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl ScreenshotSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PreviewError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| PreviewError::InvalidUrl {
            url: url.to_string(),
        })?;

        tracing::info!(%url, "fetching screenshot");
        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            tracing::warn!(%url, status = status.as_u16(), %reason, "screenshot request rejected");
            return Err(PreviewError::Fetch {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(%url, bytes = body.len(), "screenshot downloaded");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::screenshot::processor::tests::opaque_png;
    use axum::http::{header, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve a PNG at `/shot.png`, a 404 everywhere else, and a 500 at `/broken`
    pub(crate) async fn spawn_image_server() -> String {
        let png = opaque_png(200, 200);
        let app = Router::new()
            .route(
                "/shot.png",
                get(move || {
                    let png = png.clone();
                    async move { ([(header::CONTENT_TYPE, "image/png")], png) }
                }),
            )
            .route(
                "/broken",
                get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
            )
            .route("/not-an-image", get(|| async { "hello" }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&PreviewConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_returns_body() {
        let base = spawn_image_server().await;
        let bytes = fetcher().fetch(&format!("{}/shot.png", base)).await.unwrap();
        assert_eq!(bytes, opaque_png(200, 200));
    }

    #[tokio::test]
    async fn test_fetch_404_reports_status_and_reason() {
        let base = spawn_image_server().await;
        let err = fetcher()
            .fetch(&format!("{}/missing.png", base))
            .await
            .unwrap_err();

        match err {
            PreviewError::Fetch { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_500_is_an_error() {
        let base = spawn_image_server().await;
        let err = fetcher().fetch(&format!("{}/broken", base)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetcher()
            .fetch(&format!("http://{}/shot.png", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, PreviewError::Network(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, PreviewError::InvalidUrl { .. }));
    }
}
