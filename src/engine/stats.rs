// Live fetch progress — attempts, saves, skips, bytes written and worker count.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub total: usize,
    pub attempted: usize,
    pub saved: usize,
    pub skipped: usize,
    pub bytes_written: u64,
    pub active_workers: u32,
    pub download_bps: u64,
}

pub struct StatsCollector {
    total: AtomicUsize,
    attempted: AtomicUsize,
    saved: AtomicUsize,
    skipped: AtomicUsize,
    bytes_written: AtomicU64,
    active_workers: AtomicU32,
    started: Instant,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            attempted: AtomicUsize::new(0),
            saved: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            bytes_written: AtomicU64::new(0),
            active_workers: AtomicU32::new(0),
            started: Instant::now(),
        }
    }

    pub fn add_total(&self, n: usize) {
        self.total.fetch_add(n, Ordering::Relaxed);
    }

    /// Record the start of an attempt, returning its 1-based position.
    pub fn record_attempt(&self) -> usize {
        self.attempted.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_saved(&self) {
        self.saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_written(&self, bytes: u64) {
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_workers(&self) {
        self.active_workers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_workers(&self) {
        self.active_workers.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let bytes_written = self.bytes_written.load(Ordering::Relaxed);
        let elapsed = self.started.elapsed().as_secs_f64();
        let download_bps = if elapsed > 0.1 {
            (bytes_written as f64 / elapsed) as u64
        } else {
            0
        };

        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            attempted: self.attempted.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            bytes_written,
            active_workers: self.active_workers.load(Ordering::Relaxed),
            download_bps,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = StatsCollector::new();
        stats.add_total(4);
        assert_eq!(stats.record_attempt(), 1);
        assert_eq!(stats.record_attempt(), 2);
        assert_eq!(stats.record_attempt(), 3);

        stats.record_saved();
        stats.record_saved();
        stats.record_skipped();
        stats.record_written(1000);
        stats.record_written(500);

        stats.increment_workers();
        stats.increment_workers();
        stats.decrement_workers();

        let snap = stats.snapshot();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.attempted, 3);
        assert_eq!(snap.saved, 2);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.bytes_written, 1500);
        assert_eq!(snap.active_workers, 1);
    }
}
