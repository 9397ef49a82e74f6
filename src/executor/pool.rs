use super::handle::TaskHandle;
use super::panic_handler::PanicHandler;
use super::task::{Priority, Task, TaskId, DEFAULT_PRIORITY};
use super::worker::{Shared, Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scheduler::current_depth;
use crate::telemetry::MetricsSnapshot;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

/// Fixed-size pool of worker threads servicing one shared priority queue.
///
/// Tasks submitted while the calling thread is already `max_recursion_depth`
/// levels deep in pool-dispatched work run inline instead of being queued, and
/// [`ThreadPool::wait`] runs queued tasks while it blocks. Together these let a
/// task submit and wait on sub-tasks even when every worker is busy.
///
/// Dropping the pool (or calling [`ThreadPool::shutdown`]) stops the workers
/// without draining the queue: tasks that have not started are dropped and
/// their handles resolve to [`Error::Discarded`].
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<WorkerHandle>>,
    worker_threads: Vec<ThreadId>,
    num_threads: usize,
    max_recursion_depth: usize,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
}

impl ThreadPool {
    /// `num_threads == 0` uses the host's hardware concurrency.
    pub fn new(num_threads: usize, max_recursion_depth: usize) -> Result<Self> {
        let config = Config::builder()
            .num_threads(num_threads)
            .max_recursion_depth(max_recursion_depth)
            .build()?;
        Self::with_config(config)
    }

    /// Hardware concurrency workers, default recursion depth.
    pub fn default_pool() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();
        let shared = Arc::new(Shared::new(PanicHandler::new(config.panic_strategy)));

        let mut pool = Self {
            shared,
            workers: Mutex::new(Vec::with_capacity(num_threads)),
            worker_threads: Vec::with_capacity(num_threads),
            num_threads,
            max_recursion_depth: config.max_recursion_depth,
        };

        for id in 0..num_threads {
            let worker = Worker::new(id, pool.shared.clone());
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            // on error `pool` is dropped here, which stops and joins the
            // workers spawned so far
            let thread = builder
                .spawn(move || worker.run())
                .map_err(|e| Error::executor(format!("spawn failed: {}", e)))?;

            pool.worker_threads.push(thread.thread().id());
            pool.workers.get_mut().push(WorkerHandle {
                id,
                thread: Some(thread),
            });
        }

        tracing::info!(
            pool = pool.shared.id,
            workers = num_threads,
            max_recursion_depth = pool.max_recursion_depth,
            "thread pool started"
        );

        Ok(pool)
    }

    /// Submit with the default priority (0).
    pub fn submit<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit_with_priority(DEFAULT_PRIORITY, f)
    }

    /// Submit a task. Never blocks.
    ///
    /// On a stopped pool the returned handle already holds
    /// [`Error::Stopped`]. When the calling thread has reached the recursion
    /// bound, `f` runs right here and the handle is complete on return.
    pub fn submit_with_priority<F, T>(&self, priority: Priority, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.try_submit_with_priority(priority, f)
            .unwrap_or_else(TaskHandle::failed)
    }

    pub fn try_submit<F, T>(&self, f: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.try_submit_with_priority(DEFAULT_PRIORITY, f)
    }

    /// Like [`ThreadPool::submit_with_priority`] but rejects with
    /// `Err(Error::Stopped)` once the pool has been shut down.
    pub fn try_submit_with_priority<F, T>(&self, priority: Priority, f: F) -> Result<TaskHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.shared.is_stopped() {
            return Err(Error::Stopped);
        }

        let id = TaskId::next();
        let depth = current_depth();

        if depth >= self.max_recursion_depth {
            tracing::trace!(task = %id, depth, "recursion bound reached, running inline");
            self.shared.metrics.record_submitted();
            self.shared.metrics.record_inlined();
            let outcome = self.shared.panic_handler.execute(id, f);
            return Ok(TaskHandle::ready(id, outcome));
        }

        let (tx, handle) = TaskHandle::channel(id, self.shared.id);
        let task = Task::new(id, priority, move |id, panics| {
            // the submitter may have dropped its handle
            let _ = tx.send(panics.execute(id, f));
        });

        {
            let mut store = self.shared.store.lock();
            if self.shared.is_stopped() {
                return Err(Error::Stopped);
            }
            store.push(task);
            self.shared.available.notify_all();
        }

        self.shared.metrics.record_submitted();
        tracing::trace!(task = %id, priority, depth, "task queued");

        Ok(handle)
    }

    /// Block until `handle` completes, running queued tasks in the meantime.
    ///
    /// Safe to call from inside a task. If the pool stops before the outcome
    /// is available this returns [`Error::Stopped`]. Handles from another pool
    /// fall back to [`TaskHandle::join`].
    pub fn wait<T>(&self, mut handle: TaskHandle<T>) -> Result<T> {
        if let Some(pool) = handle.pool_id() {
            if pool != self.shared.id {
                return handle.join();
            }
        }

        loop {
            // readiness is checked under the lock so that the completion
            // broadcast cannot slip in before we sleep
            let store = self.shared.store.lock();
            if handle.is_finished() {
                drop(store);
                return handle.take_outcome();
            }
            if self.shared.is_stopped() {
                return Err(Error::Stopped);
            }
            self.shared.try_execute_one(store);
        }
    }

    /// Stop the pool: set the stop flag, drop every task that has not
    /// started, wake all waiters and join the workers. Idempotent.
    ///
    /// Every caller returns only once all workers have been joined, except
    /// when called from one of this pool's own workers: the first such caller
    /// joins the others and detaches itself, later ones return right away.
    pub fn shutdown(&self) {
        let discarded = {
            let mut store = self.shared.store.lock();
            if self.shared.stopped.swap(true, Ordering::AcqRel) {
                None
            } else {
                let discarded = store.drain();
                self.shared.available.notify_all();
                Some(discarded)
            }
        };

        let current = thread::current().id();
        let first = discarded.is_some();
        let discarded_count = discarded.as_ref().map_or(0, Vec::len);

        if let Some(discarded) = discarded {
            self.shared.metrics.record_discarded(discarded_count);
            // closing their result channels resolves the handles to `Discarded`
            drop(discarded);
        } else if self.worker_threads.contains(&current) {
            // the first caller may be joining this very thread
            return;
        }

        // later callers block here until the first one has joined everyone
        let mut workers = self.workers.lock();
        for worker in workers.iter_mut() {
            let Some(thread) = worker.thread.take() else {
                continue;
            };
            if thread.thread().id() == current {
                continue;
            }
            if thread.join().is_err() {
                tracing::warn!(worker = worker.id, "worker thread panicked");
            }
        }

        if first {
            tracing::info!(
                pool = self.shared.id,
                discarded = discarded_count,
                "thread pool stopped"
            );
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.is_stopped()
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn max_recursion_depth(&self) -> usize {
        self.max_recursion_depth
    }

    /// Tasks queued but not yet started.
    pub fn pending_tasks(&self) -> usize {
        self.shared.store.lock().len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        let panicked = self.shared.panic_handler.panic_count() as u64;
        self.shared.metrics.snapshot(panicked)
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads)
            .field("max_recursion_depth", &self.max_recursion_depth)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
