// Per-image fetch results and the run summary built from them.

use std::fmt;
use std::path::PathBuf;

use crate::manifest::ImageRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Final response status was outside [200, 400).
    Status(u16),
    /// The request or the body transfer failed.
    Transport(String),
    /// Writing the local file failed.
    Io(String),
    /// The run was cancelled before the image was saved.
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Status(code) => write!(f, "HTTP {code}"),
            SkipReason::Transport(e) => write!(f, "transport error: {e}"),
            SkipReason::Io(e) => write!(f, "write error: {e}"),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Saved {
        image: ImageRef,
        path: PathBuf,
        bytes: u64,
    },
    Skipped {
        image: ImageRef,
        reason: SkipReason,
    },
}

impl FetchOutcome {
    /// Saved path, if the image was written.
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match self {
            FetchOutcome::Saved { path, .. } => Some(path),
            FetchOutcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub attempted: usize,
    pub saved: Vec<PathBuf>,
    pub skipped: Vec<(ImageRef, SkipReason)>,
    pub bytes_written: u64,
}

impl FetchSummary {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Saved { path, bytes, .. } => {
                self.attempted += 1;
                self.saved.push(path.clone());
                self.bytes_written += bytes;
            }
            FetchOutcome::Skipped { image, reason } => {
                if *reason != SkipReason::Cancelled {
                    self.attempted += 1;
                }
                self.skipped.push((image.clone(), reason.clone()));
            }
        }
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted {}, saved {}, skipped {} ({} bytes written)",
            self.attempted,
            self.saved.len(),
            self.skipped.len(),
            self.bytes_written
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageRef {
        ImageRef {
            source_uri: format!("https://example.org/{name}"),
            filename: format!("{name}.jpeg"),
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = FetchSummary::default();
        summary.record(&FetchOutcome::Saved {
            image: image("a"),
            path: PathBuf::from("/tmp/a.jpeg"),
            bytes: 10,
        });
        summary.record(&FetchOutcome::Skipped {
            image: image("b"),
            reason: SkipReason::Status(404),
        });
        summary.record(&FetchOutcome::Skipped {
            image: image("c"),
            reason: SkipReason::Cancelled,
        });

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.saved, vec![PathBuf::from("/tmp/a.jpeg")]);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.bytes_written, 10);
        assert_eq!(
            summary.to_string(),
            "attempted 2, saved 1, skipped 2 (10 bytes written)"
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Status(503).to_string(), "HTTP 503");
        assert_eq!(SkipReason::Cancelled.to_string(), "cancelled");
    }
}
