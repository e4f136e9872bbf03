//! Aggregate timing totals for one worker pool.

use std::time::Duration;

/// Running totals of per-connection time spans.
///
/// All five durations grow monotonically; they are only mutated through
/// `Pool::add_spans` under the pool lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total time connections spent between accept and queueing.
    pub accept_time: Duration,
    /// Total time connections waited in the queue.
    pub queue_time: Duration,
    /// Total time spent running request filters.
    pub filter_time: Duration,
    /// Total time spent in the main request handler.
    pub run_time: Duration,
    /// Total time spent in post-run trace processing.
    pub trace_time: Duration,
    /// Number of connections folded into these totals.
    pub finalized: u64,
}

impl PoolStats {
    /// Sum of all five phase totals.
    pub fn total_time(&self) -> Duration {
        self.accept_time + self.queue_time + self.filter_time + self.run_time + self.trace_time
    }
}
