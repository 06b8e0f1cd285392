// Engine — sampling, image fetching and the run pipeline that ties them to the manifest reader.

pub mod fetcher;
pub mod outcome;
pub mod pipeline;
pub mod sampler;
pub mod stats;
