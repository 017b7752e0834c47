//! Asset types, load bookkeeping and byte sources

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::container::decode_container;
use crate::error::AssetError;

/// How fetched bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// glTF container holding a model
    Container,
    /// Raw bytes, no decoding
    Binary,
}

/// Description of the model carried by a container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelResource {
    /// Name of the default scene, if the container names it
    pub name: Option<String>,
    pub nodes: Vec<String>,
    pub meshes: Vec<String>,
}

/// Decoded container asset
#[derive(Debug, Clone)]
pub struct ContainerResource {
    pub model: Arc<ModelResource>,
    pub generator: Option<String>,
    /// Size of the embedded binary chunk, 0 for JSON-only containers
    pub binary_len: usize,
}

#[derive(Debug, Clone)]
pub enum AssetResource {
    Container(ContainerResource),
    Binary(Arc<[u8]>),
}

/// A loaded asset
#[derive(Debug, Clone)]
pub struct Asset {
    pub url: String,
    pub kind: AssetKind,
    pub resource: AssetResource,
}

impl Asset {
    /// Decode fetched bytes according to `kind`
    pub fn decode(url: &str, kind: AssetKind, bytes: Vec<u8>) -> Result<Self, AssetError> {
        let resource = match kind {
            AssetKind::Container => AssetResource::Container(decode_container(&bytes)?),
            AssetKind::Binary => AssetResource::Binary(bytes.into()),
        };
        Ok(Self {
            url: url.to_string(),
            kind,
            resource,
        })
    }

    pub fn container(&self) -> Option<&ContainerResource> {
        match &self.resource {
            AssetResource::Container(container) => Some(container),
            AssetResource::Binary(_) => None,
        }
    }
}

/// Identifies one load request within a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadId(pub(crate) u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(AssetError),
    Cancelled,
}

impl LoadStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, LoadStatus::Pending)
    }
}

pub type FetchFuture = BoxFuture<'static, Result<Vec<u8>, AssetError>>;

/// Fetches raw asset bytes by URL
pub trait AssetSource: Send + Sync {
    fn fetch(&self, url: &str) -> FetchFuture;
}

/// Serves assets from an in-memory table
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetSource {
    entries: HashMap<String, Arc<[u8]>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.entries.insert(url.into(), bytes.into());
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, url: &str) -> FetchFuture {
        let result = match self.entries.get(url) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => Err(AssetError::Fetch {
                url: url.to_string(),
                reason: "not found".to_string(),
            }),
        };
        future::ready(result).boxed()
    }
}

/// Reads assets from disk. Accepts plain paths and `file://` URLs;
/// relative paths resolve against the base directory.
#[derive(Debug, Default, Clone)]
pub struct FileAssetSource {
    base_dir: Option<PathBuf>,
}

impl FileAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AssetSource for FileAssetSource {
    fn fetch(&self, url: &str) -> FetchFuture {
        let path = self.resolve(url);
        let url = url.to_string();
        async move {
            tokio::fs::read(&path).await.map_err(|e| AssetError::Fetch {
                url,
                reason: e.to_string(),
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemoryAssetSource::new().with_asset("mem://a", b"abc".to_vec());
        assert_eq!(source.fetch("mem://a").await.unwrap(), b"abc");
        assert!(matches!(
            source.fetch("mem://missing").await,
            Err(AssetError::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_source_resolves_relative_and_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.gltf"), b"{}").unwrap();

        let source = FileAssetSource::with_base_dir(dir.path());
        assert_eq!(source.fetch("model.gltf").await.unwrap(), b"{}");
        assert_eq!(source.fetch("file://model.gltf").await.unwrap(), b"{}");

        let absolute = dir.path().join("model.gltf");
        let plain = FileAssetSource::new();
        assert_eq!(plain.fetch(&absolute.to_string_lossy()).await.unwrap(), b"{}");
        assert!(plain.fetch("/definitely/not/here.glb").await.is_err());
    }

    #[test]
    fn test_binary_assets_skip_decoding() {
        let asset = Asset::decode("mem://raw", AssetKind::Binary, vec![1, 2, 3]).unwrap();
        assert!(asset.container().is_none());
        assert!(Asset::decode("mem://raw", AssetKind::Container, vec![1, 2, 3]).is_err());
    }
}
