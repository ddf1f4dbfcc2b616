//! Progress tracking for pipeline execution.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Execution has started.
    Started { total_steps: usize },
    /// A step has started processing.
    StepStarted {
        index: usize,
        operation: String,
        total: usize,
    },
    /// A step was applied to the image.
    StepCompleted {
        index: usize,
        operation: String,
        duration_ms: u64,
        total: usize,
    },
    /// A step failed and was skipped; the image is unchanged.
    StepFailed {
        index: usize,
        operation: String,
        message: String,
    },
    /// Execution has completed.
    Completed {
        total_duration_ms: u64,
        steps_applied: usize,
        steps_failed: usize,
    },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks execution progress and step timings.
pub struct ProgressTracker {
    /// Total number of steps to process.
    total_steps: usize,
    /// Number of steps applied.
    applied_steps: AtomicU64,
    /// Number of steps that failed.
    failed_steps: AtomicU64,
    /// Start time.
    start_time: Option<Instant>,
    /// Progress callback.
    callback: Option<Arc<ProgressCallback>>,
    /// Step durations for estimation.
    step_times: parking_lot::Mutex<Vec<u64>>,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            applied_steps: AtomicU64::new(0),
            failed_steps: AtomicU64::new(0),
            start_time: None,
            callback: None,
            step_times: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: Arc<ProgressCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Start tracking.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.send_update(ProgressUpdate::Started {
            total_steps: self.total_steps,
        });
    }

    /// Report that a step has started.
    pub fn step_started(&self, index: usize, operation: &str) {
        self.send_update(ProgressUpdate::StepStarted {
            index,
            operation: operation.to_string(),
            total: self.total_steps,
        });
    }

    /// Report that a step was applied.
    pub fn step_completed(&self, index: usize, operation: &str, duration_ms: u64) {
        self.applied_steps.fetch_add(1, Ordering::Relaxed);
        self.step_times.lock().push(duration_ms);

        self.send_update(ProgressUpdate::StepCompleted {
            index,
            operation: operation.to_string(),
            duration_ms,
            total: self.total_steps,
        });
    }

    /// Report that a step failed.
    pub fn step_failed(&self, index: usize, operation: &str, message: String) {
        self.failed_steps.fetch_add(1, Ordering::Relaxed);
        self.send_update(ProgressUpdate::StepFailed {
            index,
            operation: operation.to_string(),
            message,
        });
    }

    /// Complete tracking.
    pub fn complete(&self) {
        self.send_update(ProgressUpdate::Completed {
            total_duration_ms: self.elapsed_ms(),
            steps_applied: self.applied_steps.load(Ordering::Relaxed) as usize,
            steps_failed: self.failed_steps.load(Ordering::Relaxed) as usize,
        });
    }

    /// Milliseconds since [`start`](Self::start), or 0 before it.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Get current progress percentage.
    pub fn progress_percent(&self) -> f32 {
        if self.total_steps == 0 {
            return 100.0;
        }
        let done = self.applied_steps.load(Ordering::Relaxed)
            + self.failed_steps.load(Ordering::Relaxed);
        (done as f32 / self.total_steps as f32) * 100.0
    }

    /// Estimate remaining time in milliseconds from the mean applied-step time.
    pub fn estimated_remaining_ms(&self) -> Option<u64> {
        let times = self.step_times.lock();
        if times.is_empty() {
            return None;
        }

        let avg_time: u64 = times.iter().sum::<u64>() / times.len() as u64;
        let done = (self.applied_steps.load(Ordering::Relaxed)
            + self.failed_steps.load(Ordering::Relaxed)) as usize;
        let remaining = self.total_steps.saturating_sub(done);

        Some(avg_time * remaining as u64)
    }

    fn send_update(&self, update: ProgressUpdate) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0)
    }
}
