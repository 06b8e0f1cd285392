use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use tracing::{debug, info};

use super::model::Manifest;
use super::{ImageList, ImageRef};
use crate::config::IMAGE_EXTENSION;
use crate::error::{Collection, ManifestError};
use crate::source::traits::RemoteSource;

pub struct ManifestReader {
    source: Arc<dyn RemoteSource>,
}

impl ManifestReader {
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self { source }
    }

    /// Fetch and parse the manifest at `uri`, returning one image per canvas
    /// of its first sequence.
    ///
    /// `uri` may be an `http(s)://` URL, a `file://` URL or a local path.
    pub async fn get_images_from_manifest(&self, uri: &str) -> Result<ImageList, ManifestError> {
        let document = self.load(uri).await?;
        let manifest = parse_manifest(uri, &document)?;
        let id = manifest.id.as_deref().unwrap_or(uri);
        if let Some(label) = manifest.label_text() {
            info!("manifest {} loaded: {}", id, label);
        }
        let images = extract_images(uri, &manifest)?;
        info!("manifest {} lists {} images", id, images.len());
        Ok(images)
    }

    async fn load(&self, uri: &str) -> Result<Bytes, ManifestError> {
        let fetch_err = |reason: String| ManifestError::Fetch {
            uri: uri.to_string(),
            reason,
        };

        // Url lowercases the scheme, so `HTTPS://` is fetched like `https://`.
        // Anything that is not a URL is taken as a local path.
        let path = match Url::parse(uri) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                debug!("fetching manifest over http: {}", url);
                return self
                    .source
                    .fetch_document(url.as_str())
                    .await
                    .map_err(|e| fetch_err(format!("{:#}", e)));
            }
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|()| fetch_err("not a local file URL".to_string()))?,
            _ => PathBuf::from(uri),
        };

        debug!("reading manifest from disk: {}", path.display());
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| fetch_err(e.to_string()))
    }
}

pub fn parse_manifest(uri: &str, document: &[u8]) -> Result<Manifest, ManifestError> {
    serde_json::from_slice(document).map_err(|e| ManifestError::Parse {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

/// First image of every canvas in the first sequence, in canvas order.
pub fn extract_images(uri: &str, manifest: &Manifest) -> Result<ImageList, ManifestError> {
    let empty = |collection: Collection| ManifestError::EmptyCollection {
        uri: uri.to_string(),
        collection,
    };

    let sequence = manifest
        .sequences
        .first()
        .ok_or_else(|| empty(Collection::Sequences))?;
    if sequence.canvases.is_empty() {
        return Err(empty(Collection::Canvases));
    }

    sequence
        .canvases
        .iter()
        .map(|canvas| -> Result<ImageRef, ManifestError> {
            let image = canvas
                .images
                .first()
                .ok_or_else(|| empty(Collection::Images(canvas.id.clone())))?;
            Ok(ImageRef {
                source_uri: image.resource.id.clone(),
                filename: format!("{}.{}", canvas.id_tail(), IMAGE_EXTENSION),
            })
        })
        .collect()
}
