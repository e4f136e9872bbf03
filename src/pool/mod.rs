//! Worker pool identity and shared statistics.
//!
//! # Data Flow
//! ```text
//! worker thread finishes a connection
//!     → conn::timing::finalize()
//!     → Pool::add_spans() (single mutex, five additions)
//!
//! reporting code
//!     → Pool::snapshot() (same mutex)
//! ```
//!
//! # Design Decisions
//! - The pool mutex is the only concurrently shared mutable state in the
//!   core; its critical section is the five-value add or read, never I/O
//! - Connections hold an `Arc<Pool>`; the pool holds no back-references

pub mod stats;

use std::sync::Mutex;
use std::time::Duration;

use crate::conn::timing::TimeSpans;
pub use stats::PoolStats;

/// A named group of worker threads sharing aggregate timing statistics.
#[derive(Debug)]
pub struct Pool {
    name: String,
    stats: Mutex<PoolStats>,
}

impl Pool {
    /// Create a pool with empty statistics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: Mutex::new(PoolStats::default()),
        }
    }

    /// Pool name, for logging and reporting.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fold one connection's spans plus its trailing trace span into the
    /// running totals. Called from `conn::timing::finalize`.
    pub(crate) fn add_spans(&self, spans: TimeSpans, trace: Duration) {
        let mut stats = self.stats.lock().expect("pool stats lock poisoned");
        stats.accept_time += spans.accept;
        stats.queue_time += spans.queue;
        stats.filter_time += spans.filter;
        stats.run_time += spans.run;
        stats.trace_time += trace;
        stats.finalized += 1;
    }

    /// Copy of the current aggregate, taken under the pool lock.
    pub fn snapshot(&self) -> PoolStats {
        *self.stats.lock().expect("pool stats lock poisoned")
    }
}
