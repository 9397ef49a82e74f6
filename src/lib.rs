//! nestpool - a fixed-size priority thread pool for nested work
//!
//! Tasks go into one shared priority queue serviced by a fixed set of worker
//! threads. Any thread, a worker included, can block on a task's result with
//! [`ThreadPool::wait`], which keeps running queued tasks while it waits.
//! Submission depth is bounded per thread: once a thread is
//! `max_recursion_depth` levels deep in pool-dispatched tasks, further
//! submissions from it run inline.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use nestpool::ThreadPool;
//!
//! let pool = Arc::new(ThreadPool::new(2, 5).unwrap());
//!
//! let inner = pool.clone();
//! let total = pool.submit_with_priority(10, move || {
//!     let parts: Vec<_> = (1..=4u64)
//!         .map(|n| inner.submit(move || n * n))
//!         .collect();
//!     parts.into_iter().map(|h| inner.wait(h).unwrap()).sum::<u64>()
//! });
//!
//! assert_eq!(pool.wait(total).unwrap(), 30);
//! ```
//!
//! # Features
//!
//! - **Priority scheduling**: higher priority first, FIFO among equals
//! - **Work-helping waits**: blocked callers drain the queue instead of idling
//! - **Bounded recursion**: deep nested submission falls back to inline execution
//! - **Panic isolation**: a panicking task fails its own handle, never a worker
//! - **Non-graceful shutdown**: queued tasks are dropped and report `Discarded`

// Lint configuration
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod scheduler;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder, DEFAULT_MAX_RECURSION_DEPTH};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, Priority, TaskHandle, TaskId, ThreadPool};
pub use scheduler::current_depth;
pub use telemetry::MetricsSnapshot;
