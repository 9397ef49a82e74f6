//! Counters describing what a pool has done since it started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Pool metrics collector
#[derive(Debug)]
pub struct PoolMetrics {
    tasks_submitted: AtomicU64,
    tasks_executed: AtomicU64,
    tasks_inlined: AtomicU64,
    tasks_discarded: AtomicU64,
    busy_time_ns: AtomicU64,
    start_time: Instant,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self {
            tasks_submitted: AtomicU64::new(0),
            tasks_executed: AtomicU64::new(0),
            tasks_inlined: AtomicU64::new(0),
            tasks_discarded: AtomicU64::new(0),
            busy_time_ns: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A task taken from the store ran to completion (or panicked).
    pub fn record_task_execution(&self, duration: Duration) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);
        self.busy_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_inlined(&self) {
        self.tasks_inlined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self, count: usize) {
        self.tasks_discarded
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// `tasks_panicked` comes from the pool's panic handler.
    pub fn snapshot(&self, tasks_panicked: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            tasks_inlined: self.tasks_inlined.load(Ordering::Relaxed),
            tasks_panicked,
            tasks_discarded: self.tasks_discarded.load(Ordering::Relaxed),
            busy_time_ns: self.busy_time_ns.load(Ordering::Relaxed),
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub tasks_submitted: u64,
    /// Tasks run from the store, by workers or by helping waiters.
    pub tasks_executed: u64,
    /// Tasks run on the submitting thread because of the recursion bound.
    pub tasks_inlined: u64,
    pub tasks_panicked: u64,
    pub tasks_discarded: u64,
    pub busy_time_ns: u64,
}

impl MetricsSnapshot {
    pub fn avg_task_time(&self) -> Duration {
        if self.tasks_executed == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.busy_time_ns / self.tasks_executed)
    }

    pub fn tasks_per_second(&self) -> f64 {
        let seconds = self.uptime.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.tasks_executed as f64 / seconds
    }
}
