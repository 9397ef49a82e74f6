//! Per-thread nesting depth of pool-driven task execution.
//!
//! Every thread starts at depth 0, whether it is a pool worker or an outside
//! caller. The counter only moves while a thread runs a task it took from a
//! pool's store; inline execution leaves it untouched.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Number of store-dispatched tasks currently on the calling thread's stack.
pub fn current_depth() -> usize {
    DEPTH.with(Cell::get)
}

/// Holds one level of depth for as long as it lives.
pub(crate) struct DepthGuard {
    // tied to the thread whose counter it bumped
    _not_send: PhantomData<*const ()>,
}

impl DepthGuard {
    pub fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
