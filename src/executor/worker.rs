// worker thread stuff
use super::panic_handler::PanicHandler;
use crate::scheduler::{DepthGuard, TaskStore};
use crate::telemetry::PoolMetrics;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub type WorkerId = usize;

static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// State shared by the pool handle, its workers and every waiting caller.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) id: u64,
    pub(crate) store: Mutex<TaskStore>,
    pub(crate) available: Condvar,
    // only written while `store` is locked
    pub(crate) stopped: AtomicBool,
    pub(crate) panic_handler: PanicHandler,
    pub(crate) metrics: PoolMetrics,
}

impl Shared {
    pub fn new(panic_handler: PanicHandler) -> Self {
        Self {
            id: POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            store: Mutex::new(TaskStore::new()),
            available: Condvar::new(),
            stopped: AtomicBool::new(false),
            panic_handler,
            metrics: PoolMetrics::new(),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// One attempt at useful work, starting from a held store lock.
    ///
    /// Returns without running anything if the pool is stopped, or after one
    /// wake-up if the store is empty. Otherwise pops the highest-priority task
    /// and runs it on the calling thread with the lock released.
    pub fn try_execute_one(&self, mut store: MutexGuard<'_, TaskStore>) {
        if self.is_stopped() {
            return;
        }

        let Some(task) = store.pop() else {
            self.available.wait(&mut store);
            return;
        };
        drop(store);

        let start = Instant::now();
        {
            let _depth = DepthGuard::enter();
            task.execute(&self.panic_handler);
        }
        self.metrics.record_task_execution(start.elapsed());

        let _store = self.store.lock();
        self.available.notify_all();
    }
}

pub(crate) struct Worker {
    pub id: WorkerId,
    shared: Arc<Shared>,
}

impl Worker {
    pub fn new(id: WorkerId, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    // main loop
    pub fn run(self) {
        tracing::debug!(worker = self.id, pool = self.shared.id, "worker started");

        loop {
            let store = self.shared.store.lock();
            if self.shared.is_stopped() {
                break;
            }
            self.shared.try_execute_one(store);
        }

        tracing::debug!(worker = self.id, pool = self.shared.id, "worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::task::{Task, TaskId};
    use crate::scheduler::current_depth;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_execute_one_runs_highest_priority() {
        let shared = Shared::new(PanicHandler::default());
        let order = Arc::new(Mutex::new(Vec::new()));

        for priority in [1, 7, 3] {
            let order = order.clone();
            shared.store.lock().push(Task::new(TaskId::next(), priority, move |_, _| {
                order.lock().push(priority);
            }));
        }

        for _ in 0..3 {
            shared.try_execute_one(shared.store.lock());
        }

        assert_eq!(*order.lock(), vec![7, 3, 1]);
        assert_eq!(shared.store.lock().len(), 0);
    }

    #[test]
    fn test_execute_one_bumps_depth_on_calling_thread() {
        let shared = Shared::new(PanicHandler::default());
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        shared.store.lock().push(Task::new(TaskId::next(), 0, move |_, _| {
            seen_clone.store(current_depth(), Ordering::SeqCst);
        }));

        assert_eq!(current_depth(), 0);
        shared.try_execute_one(shared.store.lock());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(current_depth(), 0);
    }

    #[test]
    fn test_stopped_store_is_not_serviced() {
        let shared = Shared::new(PanicHandler::default());
        shared.store.lock().push(Task::new(TaskId::next(), 0, |_, _| {
            panic!("must not run");
        }));
        shared.stopped.store(true, Ordering::Release);

        shared.try_execute_one(shared.store.lock());
        assert_eq!(shared.store.lock().len(), 1);
    }

    #[test]
    fn test_worker_exits_on_stop() {
        let shared = Arc::new(Shared::new(PanicHandler::default()));
        let worker = Worker::new(0, shared.clone());
        let thread = thread::spawn(move || worker.run());

        thread::sleep(Duration::from_millis(20));
        {
            let _store = shared.store.lock();
            shared.stopped.store(true, Ordering::Release);
            shared.available.notify_all();
        }

        thread.join().unwrap();
    }
}
