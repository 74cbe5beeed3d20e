//! Progress reporting for batch chunking runs.
//!
//! Documents are processed concurrently, so events can arrive in any order
//! across documents; `current` counts documents finished in that phase.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Stage of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    Discover,
    Extract,
    Chunk,
    Write,
}

impl fmt::Display for ProgressPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discover => "discover",
            Self::Extract => "extract",
            Self::Chunk => "chunk",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub phase: ProgressPhase,

    /// Documents done so far in this phase
    pub current: u64,

    /// Documents expected, if known
    pub total: Option<u64>,

    pub message: String,

    /// Seconds since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    pub fn new(
        phase: ProgressPhase,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Percentage complete (0.0 - 100.0), if the total is known.
    pub fn percentage(&self) -> Option<f64> {
        self.total.map(|total| {
            if total > 0 {
                (self.current as f64 / total as f64) * 100.0
            } else {
                100.0
            }
        })
    }

    /// Format as a single user-facing line.
    pub fn format_simple(&self) -> String {
        let counter = match self.total {
            Some(total) => format!("{}/{}", self.current, total),
            None => self.current.to_string(),
        };
        let pct = self
            .percentage()
            .map(|p| format!(" ({:.0}%)", p))
            .unwrap_or_default();

        format!("[{}] {}{} - {}", self.phase, counter, pct, self.message)
    }
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Emits progress events through an optional callback.
///
/// Clones share counters, so one reporter can be handed to every worker.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Instant,
    total: Option<u64>,
    extracted: Arc<AtomicU64>,
    chunked: Arc<AtomicU64>,
    written: Arc<AtomicU64>,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self::build(Some(callback))
    }

    /// Reporter that drops every event.
    pub fn noop() -> Self {
        Self::build(None)
    }

    fn build(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            start_time: Instant::now(),
            total: None,
            extracted: Arc::new(AtomicU64::new(0)),
            chunked: Arc::new(AtomicU64::new(0)),
            written: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        let Some(callback) = &self.callback else {
            return;
        };

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let event = event.with_elapsed(elapsed);

        tracing::debug!(
            phase = %event.phase,
            current = event.current,
            total = ?event.total,
            message = %event.message,
            elapsed_secs = elapsed,
            "Progress event"
        );

        callback(event);
    }

    /// Record the number of discovered documents; later phases count against it.
    pub fn discovered(&mut self, documents: u64, root: &str) {
        self.total = Some(documents);
        self.emit(ProgressEvent::new(
            ProgressPhase::Discover,
            documents,
            Some(documents),
            format!("{} documents under {}", documents, root),
        ));
    }

    pub fn extracted(&self, file: &str, elements: usize) {
        let current = self.extracted.fetch_add(1, Ordering::SeqCst) + 1;
        self.emit(ProgressEvent::new(
            ProgressPhase::Extract,
            current,
            self.total,
            format!("{}: {} elements", file, elements),
        ));
    }

    pub fn chunked(&self, file: &str, chunks: usize) {
        let current = self.chunked.fetch_add(1, Ordering::SeqCst) + 1;
        self.emit(ProgressEvent::new(
            ProgressPhase::Chunk,
            current,
            self.total,
            format!("{}: {} chunks", file, chunks),
        ));
    }

    pub fn written(&self, destination: &str) {
        let current = self.written.fetch_add(1, Ordering::SeqCst) + 1;
        self.emit(ProgressEvent::new(
            ProgressPhase::Write,
            current,
            self.total,
            format!("wrote {}", destination),
        ));
    }
}
