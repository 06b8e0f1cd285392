pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod source;

pub use engine::fetcher::{Fetcher, SaveStream};
pub use engine::outcome::{FetchOutcome, FetchSummary, SkipReason};
pub use engine::pipeline::Pipeline;
pub use engine::sampler::{randomize, Sampler};
pub use error::ManifestError;
pub use manifest::reader::ManifestReader;
pub use manifest::{ImageList, ImageRef};
