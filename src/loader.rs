//! Resolving asset locators to natural image dimensions.
//!
//! A view may be declared without its pixel size; before it can be fitted the
//! size has to come from somewhere. [`ImageLoader`] is that somewhere. The
//! crate ships a lookup-table loader for hosts that already know their assets
//! and a file loader that reads only the image header.

use crate::{core::geo::ImageSize, prelude::HashMap, MapError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Natural pixel size of the asset at `locator`
    async fn probe(&self, locator: &str) -> Result<ImageSize>;
}

/// Loader backed by a fixed table of known sizes
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    sizes: HashMap<String, ImageSize>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: impl Into<String>, size: ImageSize) -> Self {
        self.sizes.insert(locator.into(), size);
        self
    }
}

#[async_trait]
impl ImageLoader for StaticLoader {
    async fn probe(&self, locator: &str) -> Result<ImageSize> {
        self.sizes
            .get(locator)
            .copied()
            .ok_or_else(|| MapError::AssetLoad {
                locator: locator.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// Loader that reads image headers from the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locators against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(locator),
            None => PathBuf::from(locator),
        }
    }
}

fn read_dimensions(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::io::Reader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageSize::from((width, height)))
}

#[async_trait]
impl ImageLoader for FileLoader {
    async fn probe(&self, locator: &str) -> Result<ImageSize> {
        let path = self.resolve(locator);
        let to_load_error = |reason: String| MapError::AssetLoad {
            locator: locator.to_string(),
            reason,
        };

        #[cfg(feature = "tokio-runtime")]
        let result = tokio::task::spawn_blocking(move || read_dimensions(&path))
            .await
            .map_err(|e| to_load_error(e.to_string()))?;

        #[cfg(not(feature = "tokio-runtime"))]
        let result = read_dimensions(&path);

        result.map_err(|e| match e {
            MapError::AssetLoad { .. } => e,
            other => to_load_error(other.to_string()),
        })
    }
}

/// Probe several locators concurrently, preserving input order
pub async fn probe_all(
    loader: &dyn ImageLoader,
    locators: &[&str],
) -> Vec<Result<ImageSize>> {
    join_all(locators.iter().map(|locator| loader.probe(locator))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_loader() {
        let loader = StaticLoader::new().with("map.png", ImageSize::new(4000.0, 2000.0));
        assert_eq!(loader.probe("map.png").await.unwrap(), ImageSize::new(4000.0, 2000.0));
        assert!(matches!(
            loader.probe("missing.png").await,
            Err(MapError::AssetLoad { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_loader_reads_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbImage::new(12, 7).save(&path).unwrap();

        let loader = FileLoader::with_root(dir.path());
        assert_eq!(loader.probe("tiny.png").await.unwrap(), ImageSize::new(12.0, 7.0));
    }

    #[tokio::test]
    async fn test_file_loader_missing_file_is_asset_error() {
        let loader = FileLoader::new();
        let err = loader.probe("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, MapError::AssetLoad { .. }));
    }

    #[tokio::test]
    async fn test_probe_all_keeps_order() {
        let loader = StaticLoader::new()
            .with("a", ImageSize::new(1.0, 2.0))
            .with("b", ImageSize::new(3.0, 4.0));
        let results = probe_all(&loader, &["b", "x", "a"]).await;
        assert_eq!(results[0].as_ref().unwrap(), &ImageSize::new(3.0, 4.0));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), &ImageSize::new(1.0, 2.0));
    }
}
