//! Asset fetching over HTTP(S) with a local file fallback

use anyhow::{Context, Result};
use futures_util::FutureExt;
use scenehost_engine::{AssetError, AssetSource, FetchFuture, FileAssetSource};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches `http://` and `https://` URLs with reqwest, everything else from disk
pub struct HttpAssetSource {
    client: reqwest::Client,
    files: FileAssetSource,
}

impl HttpAssetSource {
    pub fn new(timeout: Duration, files: FileAssetSource) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, files })
    }

    pub fn is_remote(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch(&self, url: &str) -> FetchFuture {
        if !Self::is_remote(url) {
            debug!(url = %url, "Reading local asset");
            return self.files.fetch(url);
        }

        let client = self.client.clone();
        let url = url.to_string();
        async move {
            info!(url = %url, "Fetching remote asset");

            let response = client.get(&url).send().await.map_err(|e| AssetError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })?;

            if !response.status().is_success() {
                warn!(
                    url = %url,
                    status = %response.status(),
                    "Asset fetch returned non-success status"
                );
                return Err(AssetError::Status {
                    url,
                    status: response.status().as_u16(),
                });
            }

            let content = response.bytes().await.map_err(|e| AssetError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            debug!(url = %url, bytes = content.len(), "Fetched remote asset");
            Ok(content.to_vec())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(HttpAssetSource::is_remote("https://example.com/duck.glb"));
        assert!(HttpAssetSource::is_remote("http://localhost:8080/duck.glb"));
        assert!(!HttpAssetSource::is_remote("file:///tmp/duck.glb"));
        assert!(!HttpAssetSource::is_remote("models/duck.glb"));
    }

    #[tokio::test]
    async fn test_local_paths_use_file_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("duck.gltf"), b"{}").unwrap();

        let source = HttpAssetSource::new(
            Duration::from_secs(1),
            FileAssetSource::with_base_dir(dir.path()),
        )
        .unwrap();
        assert_eq!(source.fetch("duck.gltf").await.unwrap(), b"{}");
        assert!(matches!(
            source.fetch("goose.gltf").await,
            Err(AssetError::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let source = HttpAssetSource::new(Duration::from_secs(2), FileAssetSource::new()).unwrap();
        let result = source.fetch("http://127.0.0.1:9/duck.glb").await;
        assert!(matches!(result, Err(AssetError::Fetch { .. })));
    }
}
