//! Phase timing for a connection and finalization into pool statistics.
//!
//! # Responsibilities
//! - Stamp the five lifecycle timestamps as the worker advances
//! - Derive the four adjacent spans
//! - Fold finished connections into the owning pool's totals
//!
//! # Phase boundaries
//! ```text
//! Accept → Queued → Dequeued → FiltersDone → RunDone
//!
//! accept_span = Queued      - Accept
//! queue_span  = Dequeued    - Queued
//! filter_span = FiltersDone - Dequeued
//! run_span    = RunDone     - FiltersDone
//! trace_span  = finalize()  - RunDone
//! ```
//!
//! # Design Decisions
//! - Timestamps are monotonic `Instant`s; spans saturate to zero instead of
//!   panicking on an out-of-order stamp
//! - `finalize` is not re-entrancy safe: calling it twice double-counts.
//!   That is a caller contract, kept observable rather than papered over

use std::time::{Duration, Instant};

use crate::conn::record::ConnectionRecord;

/// The four adjacent-phase spans of one connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSpans {
    pub accept: Duration,
    pub queue: Duration,
    pub filter: Duration,
    pub run: Duration,
}

fn span(from: Option<Instant>, to: Option<Instant>, now: Instant) -> Duration {
    match from {
        Some(from) => to.unwrap_or(now).saturating_duration_since(from),
        None => Duration::ZERO,
    }
}

impl ConnectionRecord {
    /// Stamp the moment the request was queued for a worker. First call
    /// wins; a repeat stamp is ignored.
    pub fn mark_queued(&mut self) {
        if self.queue_time.is_none() {
            self.queue_time = Some(Instant::now());
        }
    }

    /// Stamp the moment a worker dequeued the request.
    pub fn mark_dequeued(&mut self) {
        if self.dequeue_time.is_none() {
            self.dequeue_time = Some(Instant::now());
        }
    }

    /// Stamp the moment request filters finished.
    pub fn mark_filters_done(&mut self) {
        if self.filter_done_time.is_none() {
            self.filter_done_time = Some(Instant::now());
        }
    }

    /// Stamp run-done "now" and derive the four spans from the recorded
    /// boundaries. Called when the main request handler returns.
    pub fn update_spans(&mut self) {
        let now = Instant::now();
        if self.run_done_time.is_none() {
            self.run_done_time = Some(now);
        }
        self.spans = TimeSpans {
            accept: span(self.accept_time, self.queue_time, now),
            queue: span(self.queue_time, self.dequeue_time, now),
            filter: span(self.dequeue_time, self.filter_done_time, now),
            run: span(self.filter_done_time, self.run_done_time, now),
        };
    }

    /// Current spans, safe to call any number of times. Boundaries not yet
    /// stamped are computed against "now", so mid-flight diagnostics see
    /// live values.
    pub fn time_spans(&self) -> TimeSpans {
        let now = Instant::now();
        TimeSpans {
            accept: span(self.accept_time, self.queue_time, now),
            queue: span(self.queue_time, self.dequeue_time, now),
            filter: span(self.dequeue_time, self.filter_done_time, now),
            run: span(self.filter_done_time, self.run_done_time, now),
        }
    }

    /// Compute the trailing trace span and fold this connection's five
    /// spans into the owning pool's totals under the pool lock.
    ///
    /// Caller contract: invoke exactly once per connection, after
    /// [`update_spans`](Self::update_spans). A second call adds the spans
    /// again and the pool totals double-count.
    pub fn finalize(&self) {
        let now = Instant::now();
        let trace = span(self.run_done_time, None, now);
        self.pool().add_spans(self.spans, trace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::StaticDriver;
    use crate::pool::Pool;
    use std::sync::Arc;

    fn record_with_pool() -> (ConnectionRecord, Arc<Pool>) {
        let driver = Arc::new(StaticDriver::new("http", "127.0.0.1", 8000, 80, "nssock"));
        let pool = Arc::new(Pool::new("default"));
        (ConnectionRecord::new(driver, Arc::clone(&pool)), pool)
    }

    #[test]
    fn spans_follow_phase_order() {
        let (mut conn, _) = record_with_pool();
        conn.mark_queued();
        conn.mark_dequeued();
        conn.mark_filters_done();
        conn.update_spans();

        let spans = conn.time_spans();
        // All boundaries stamped; each span is a real (possibly zero)
        // duration and the stored spans match the accessor.
        assert_eq!(spans, conn.spans);
    }

    #[test]
    fn mid_flight_spans_use_now() {
        let (mut conn, _) = record_with_pool();
        conn.mark_queued();
        std::thread::sleep(Duration::from_millis(5));
        // Dequeue never stamped: queue span keeps growing against now.
        let first = conn.time_spans().queue;
        std::thread::sleep(Duration::from_millis(5));
        let second = conn.time_spans().queue;
        assert!(second > first);
        assert!(first >= Duration::from_millis(5));
    }

    #[test]
    fn repeat_marks_are_ignored() {
        let (mut conn, _) = record_with_pool();
        conn.mark_queued();
        let stamped = conn.queue_time;
        std::thread::sleep(Duration::from_millis(2));
        conn.mark_queued();
        assert_eq!(conn.queue_time, stamped);
    }

    #[test]
    fn finalize_folds_into_pool() {
        let (mut conn, pool) = record_with_pool();
        conn.mark_queued();
        conn.mark_dequeued();
        conn.mark_filters_done();
        conn.update_spans();
        conn.finalize();

        let stats = pool.snapshot();
        assert_eq!(stats.finalized, 1);
        assert_eq!(stats.accept_time, conn.spans.accept);
        assert_eq!(stats.run_time, conn.spans.run);
    }

    #[test]
    fn double_finalize_double_counts() {
        // Documented caller contract: finalize is not idempotent.
        let (mut conn, pool) = record_with_pool();
        conn.mark_queued();
        std::thread::sleep(Duration::from_millis(3));
        conn.mark_dequeued();
        conn.mark_filters_done();
        conn.update_spans();

        conn.finalize();
        let once = pool.snapshot();
        conn.finalize();
        let twice = pool.snapshot();

        assert_eq!(twice.finalized, 2);
        assert_eq!(twice.queue_time, once.queue_time * 2);
    }
}
