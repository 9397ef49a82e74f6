//! Pool observability.
//!
//! Log output goes through the `tracing` facade; this module only holds the
//! counters exposed by [`crate::ThreadPool::metrics`].

pub mod metrics;

pub use metrics::{MetricsSnapshot, PoolMetrics};
