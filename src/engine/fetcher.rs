// Image fetcher — downloads sampled images into a directory and streams back outcomes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::outcome::{FetchOutcome, FetchSummary, SkipReason};
use super::stats::StatsCollector;
use crate::config::{FetchConfig, OUTCOME_CHANNEL_CAPACITY};
use crate::manifest::{ImageList, ImageRef};
use crate::source::traits::{RemoteSource, ResponseBody};

/// Statuses treated as a successful image response. Redirects have already
/// been followed by the source, so 3xx here is whatever the server ended on.
pub fn is_saveable(status: u16) -> bool {
    (200..400).contains(&status)
}

pub struct Fetcher {
    source: Arc<dyn RemoteSource>,
    concurrency: usize,
    stats: Arc<StatsCollector>,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(source: Arc<dyn RemoteSource>, config: &FetchConfig) -> Self {
        Self {
            source,
            concurrency: config.effective_concurrency(),
            stats: Arc::new(StatsCollector::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn stats(&self) -> Arc<StatsCollector> {
        Arc::clone(&self.stats)
    }

    /// Token that stops the fetcher from starting further downloads and
    /// aborts those in flight.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start downloading `images` into `directory`.
    ///
    /// Outcomes arrive on the returned stream as each download finishes. With
    /// a concurrency of 1 they arrive in list order. `directory` must exist.
    /// Must be called from within a tokio runtime.
    pub fn save_images(&self, images: ImageList, directory: impl Into<PathBuf>) -> SaveStream {
        let directory = directory.into();
        let total = images.len();
        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);

        self.stats.add_total(total);
        let source = Arc::clone(&self.source);
        let stats = Arc::clone(&self.stats);
        let cancel = self.cancel.clone();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        tokio::spawn(async move {
            for (index, image) in images.into_iter().enumerate() {
                if tx.is_closed() {
                    debug!("outcome receiver dropped, stopping fetch");
                    return;
                }

                let permit = tokio::select! {
                    permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                        Ok(p) => p,
                        Err(_) => return,
                    },
                    _ = cancel.cancelled() => {
                        let _ = tx.send(cancelled(image)).await;
                        continue;
                    }
                };

                let task = DownloadTask {
                    source: Arc::clone(&source),
                    stats: Arc::clone(&stats),
                    cancel: cancel.clone(),
                    path: directory.join(&image.filename),
                    part_path: directory.join(part_name(&image.filename, index)),
                    image,
                    total,
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = task.run().await;
                    // Hold the permit until the outcome is queued so a
                    // sequential run reports in list order.
                    let _ = tx.send(outcome).await;
                    drop(permit);
                });
            }
        });

        SaveStream { rx, total }
    }
}

/// Hidden per-task file the body is streamed into before being renamed over
/// the target, so images sharing a filename never write into one file.
fn part_name(filename: &str, index: usize) -> String {
    format!(".{}.{}-{}.part", filename, std::process::id(), index)
}

fn cancelled(image: ImageRef) -> FetchOutcome {
    FetchOutcome::Skipped {
        image,
        reason: SkipReason::Cancelled,
    }
}

struct DownloadTask {
    source: Arc<dyn RemoteSource>,
    stats: Arc<StatsCollector>,
    cancel: CancellationToken,
    image: ImageRef,
    path: PathBuf,
    part_path: PathBuf,
    total: usize,
}

impl DownloadTask {
    async fn run(self) -> FetchOutcome {
        if self.cancel.is_cancelled() {
            return cancelled(self.image);
        }

        let position = self.stats.record_attempt();
        info!("[{}/{}] fetching {}", position, self.total, self.image.source_uri);

        self.stats.increment_workers();
        let result = download(
            self.source.as_ref(),
            &self.image.source_uri,
            &self.path,
            &self.part_path,
            &self.stats,
            &self.cancel,
        )
        .await;
        self.stats.decrement_workers();

        match result {
            Ok(bytes) => {
                self.stats.record_saved();
                debug!("saved {} ({} bytes)", self.path.display(), bytes);
                FetchOutcome::Saved {
                    image: self.image,
                    path: self.path,
                    bytes,
                }
            }
            Err(reason) => {
                self.stats.record_skipped();
                warn!("skipped {}: {}", self.image.source_uri, reason);
                FetchOutcome::Skipped {
                    image: self.image,
                    reason,
                }
            }
        }
    }
}

/// GET `uri` and stream the body into `part_path`, then rename it over `path`.
///
/// `path` is only replaced by a complete body; on a transfer, write or
/// cancellation failure the part file is removed and `path` is left as it was.
async fn download(
    source: &dyn RemoteSource,
    uri: &str,
    path: &Path,
    part_path: &Path,
    stats: &StatsCollector,
    cancel: &CancellationToken,
) -> Result<u64, SkipReason> {
    let resp = tokio::select! {
        resp = source.get(uri) => resp.map_err(|e| SkipReason::Transport(format!("{:#}", e)))?,
        _ = cancel.cancelled() => return Err(SkipReason::Cancelled),
    };
    if !is_saveable(resp.status) {
        return Err(SkipReason::Status(resp.status));
    }

    let mut file = File::create(part_path)
        .await
        .map_err(|e| SkipReason::Io(e.to_string()))?;
    let copied = tokio::select! {
        copied = copy_body(resp.body, &mut file, stats) => copied,
        _ = cancel.cancelled() => Err(SkipReason::Cancelled),
    };
    let result = match copied {
        Ok(written) => file
            .flush()
            .await
            .map(|()| written)
            .map_err(|e| SkipReason::Io(e.to_string())),
        Err(reason) => Err(reason),
    };
    drop(file);

    let result = match result {
        Ok(written) => tokio::fs::rename(part_path, path)
            .await
            .map(|()| written)
            .map_err(|e| SkipReason::Io(e.to_string())),
        Err(reason) => Err(reason),
    };
    if result.is_err() {
        remove_partial(part_path).await;
    }
    result
}

async fn copy_body(
    mut body: Box<dyn ResponseBody>,
    file: &mut File,
    stats: &StatsCollector,
) -> Result<u64, SkipReason> {
    let mut written = 0u64;
    while let Some(chunk) = body
        .chunk()
        .await
        .map_err(|e| SkipReason::Transport(format!("{:#}", e)))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| SkipReason::Io(e.to_string()))?;
        written += chunk.len() as u64;
        stats.record_written(chunk.len() as u64);
    }
    Ok(written)
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("removed partial file {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove partial file {}: {}", path.display(), e),
    }
}

/// Outcomes of a running fetch, in completion order.
pub struct SaveStream {
    rx: mpsc::Receiver<FetchOutcome>,
    total: usize,
}

impl SaveStream {
    /// Number of images handed to the fetcher.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next outcome, or `None` once every image has been reported.
    pub async fn next(&mut self) -> Option<FetchOutcome> {
        self.rx.recv().await
    }

    /// Drain the stream, returning only the saved paths.
    pub async fn saved_paths(mut self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        while let Some(outcome) = self.next().await {
            if let Some(path) = outcome.saved_path() {
                paths.push(path.clone());
            }
        }
        paths
    }

    /// Drain the stream into a summary.
    pub async fn summarize(mut self) -> FetchSummary {
        let mut summary = FetchSummary::default();
        while let Some(outcome) = self.next().await {
            summary.record(&outcome);
        }
        summary
    }
}
