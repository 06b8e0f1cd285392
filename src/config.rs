use serde::Deserialize;

/// Number of images sampled when the caller does not say otherwise.
pub const DEFAULT_IMAGE_COUNT: usize = 10;

/// Destination directory used when none is given.
pub const DEFAULT_DIRECTORY: &str = ".";

/// Extension appended to every saved image, regardless of its real format.
pub const IMAGE_EXTENSION: &str = "jpeg";

/// Upper bound on simultaneous image downloads.
pub const MAX_CONCURRENCY: u32 = 8;

/// Capacity of the outcome channel between the fetcher and its consumer.
pub const OUTCOME_CHANNEL_CAPACITY: usize = 16;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("iiif-sampler/", env!("CARGO_PKG_VERSION"));

/// Settings for the image fetch stage.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of downloads in flight. 1 keeps the run strictly sequential.
    pub max_concurrency: u32,
    /// Per-request timeout in seconds. `None` leaves the client default in place.
    pub request_timeout_secs: Option<u64>,
}

impl FetchConfig {
    /// Concurrency clamped to `1..=MAX_CONCURRENCY`.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.clamp(1, MAX_CONCURRENCY) as usize
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            request_timeout_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_concurrency_clamped() {
        let mut config = FetchConfig::default();
        assert_eq!(config.effective_concurrency(), 1);

        config.max_concurrency = 0;
        assert_eq!(config.effective_concurrency(), 1);

        config.max_concurrency = 64;
        assert_eq!(config.effective_concurrency(), MAX_CONCURRENCY as usize);
    }

    #[test]
    fn test_deserialize_from_json() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"max_concurrency": 4, "request_timeout_secs": 30}"#).unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.request_timeout_secs, Some(30));
    }
}
