// Run orchestration — manifest → sample → fetch.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use super::fetcher::{Fetcher, SaveStream};
use super::sampler::Sampler;
use crate::config::FetchConfig;
use crate::error::ManifestError;
use crate::manifest::reader::ManifestReader;
use crate::source::traits::RemoteSource;

pub struct Pipeline {
    reader: ManifestReader,
    sampler: Sampler,
    fetcher: Fetcher,
}

impl Pipeline {
    pub fn new(source: Arc<dyn RemoteSource>, sampler: Sampler, config: &FetchConfig) -> Self {
        Self {
            reader: ManifestReader::new(Arc::clone(&source)),
            sampler,
            fetcher: Fetcher::new(source, config),
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Read the manifest, sample `count` images and start saving them into
    /// `directory`. Manifest errors abort before any image is requested.
    pub async fn start(
        &self,
        manifest_uri: &str,
        count: usize,
        directory: impl Into<PathBuf>,
    ) -> Result<SaveStream, ManifestError> {
        let images = self.reader.get_images_from_manifest(manifest_uri).await?;
        let sample = self.sampler.randomize(&images, count);
        info!(
            "selected {} of {} images (requested {})",
            sample.len(),
            images.len(),
            count
        );
        Ok(self.fetcher.save_images(sample, directory))
    }
}
