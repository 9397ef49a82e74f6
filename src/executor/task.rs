//! Task representation and execution.

use crate::executor::panic_handler::PanicHandler;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Scheduling priority. Higher values are serviced first.
pub type Priority = i32;

/// Priority used by [`crate::ThreadPool::submit`].
pub const DEFAULT_PRIORITY: Priority = 0;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type-erased body of a queued task. It owns the user action together with
/// the sender half of its result channel.
pub(crate) type Job = Box<dyn FnOnce(TaskId, &PanicHandler) + Send + 'static>;

/// Internal task representation
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) priority: Priority,
    pub(crate) func: Job,
    pub(crate) spawn_time: Instant,
}

impl Task {
    pub fn new<F>(id: TaskId, priority: Priority, f: F) -> Self
    where
        F: FnOnce(TaskId, &PanicHandler) + Send + 'static,
    {
        Task {
            id,
            priority,
            func: Box::new(f),
            spawn_time: Instant::now(),
        }
    }

    /// Run the task. Panics in the user action are captured by the job
    /// itself, so this never unwinds.
    pub fn execute(self, panics: &PanicHandler) {
        (self.func)(self.id, panics);
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("spawn_time", &self.spawn_time)
            .finish()
    }
}
