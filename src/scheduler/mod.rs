//! Scheduling state shared by the pool: the priority-ordered task store and
//! the per-thread recursion tracker that decides between queueing a task and
//! running it inline.

pub(crate) mod priority;
pub mod recursion;

pub(crate) use priority::TaskStore;
pub use recursion::current_depth;
pub(crate) use recursion::DepthGuard;
