// Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FetchConfig, DEFAULT_DIRECTORY, DEFAULT_IMAGE_COUNT, MAX_CONCURRENCY};

/// Download a random sample of images from a IIIF presentation manifest.
///
/// Example: iiif-sampler https://gallica.bnf.fr/iiif/ark:/12148/bpt6k12401693/manifest.json
#[derive(Debug, Parser)]
#[command(name = "iiif-sampler", version)]
pub struct Cli {
    /// Manifest URL (http/https), file:// URL or local path
    pub manifest: String,

    /// Directory where to save the images
    #[arg(short, long, default_value = DEFAULT_DIRECTORY, value_parser = existing_directory)]
    pub directory: PathBuf,

    /// Number of images to save
    #[arg(short, long, default_value_t = DEFAULT_IMAGE_COUNT)]
    pub number: usize,

    /// Downloads in flight at once
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_CONCURRENCY as i64))]
    pub concurrency: u32,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seed for the image sampler, for reproducible selections
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            max_concurrency: self.concurrency,
            request_timeout_secs: self.timeout,
        }
    }
}

/// Accept only paths that already exist and are directories.
fn existing_directory(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.exists() {
        return Err(format!("directory '{}' does not exist", value));
    }
    if !path.is_dir() {
        return Err(format!("'{}' is not a directory", value));
    }
    Ok(path)
}
