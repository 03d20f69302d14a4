//! Progress reporting
//!
//! The planner never prints; it notifies an injected observer at fixed
//! points so the algorithm stays testable and the CLI decides how to
//! surface progress.

/// Callback surface the planner notifies as it works.
pub trait ProgressObserver {
    /// One record was bucketed. `index` is zero-based.
    fn record_processed(&mut self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// A speaker passed validation with an ordinary speaker-dependent
    /// split.
    fn speaker_validated(&mut self, speaker: &str, total_hours: f64) {
        let _ = (speaker, total_hours);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {}

/// Observer that reports through `tracing` at a fixed record interval.
#[derive(Debug)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ProgressObserver for LogProgress {
    fn record_processed(&mut self, index: usize, total: usize) {
        let done = index + 1;
        if done % self.every == 0 || done == total {
            tracing::info!("processed {}/{} records", done, total);
        }
    }

    fn speaker_validated(&mut self, speaker: &str, total_hours: f64) {
        tracing::info!(speaker = %speaker, total_hours, "speaker-dependent split");
    }
}
