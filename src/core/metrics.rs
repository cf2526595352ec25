//! Pipeline metrics for observability
//!
//! Counts dispatched messages, dispatches aborted by a handler error,
//! and how often the handler chain was re-linked.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// # Example
///
/// ```
/// use rust_logger_chain::PipelineMetrics;
///
/// let metrics = PipelineMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_failed();
///
/// assert_eq!(metrics.dispatched_count(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    /// Messages handed to the first handler
    dispatched: AtomicU64,

    /// Dispatches aborted by a handler error
    failed: AtomicU64,

    /// Times the handler chain was (re-)linked
    relinks: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            relinks: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn relink_count(&self) -> u64 {
        self.relinks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_relink(&self) -> u64 {
        self.relinks.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed dispatches as a percentage (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.dispatched_count();
        if dispatched == 0 {
            return 0.0;
        }
        (self.failed_count() as f64 / dispatched as f64) * 100.0
    }

    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.relinks.store(0, Ordering::Relaxed);
    }
}
