//! Task execution infrastructure.
//!
//! This module provides the thread pool itself, its worker threads, the task
//! representation and the handles through which results come back.

pub mod handle;
pub mod panic_handler;
pub mod pool;
pub mod task;
pub(crate) mod worker;

pub use handle::TaskHandle;
pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::ThreadPool;
pub use task::{Priority, TaskId, DEFAULT_PRIORITY};
