//! Result handles returned by task submission.

use crate::error::{Error, Result};
use crate::executor::task::TaskId;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::fmt;
use std::time::Duration;

/// Receiving end of a task's result channel.
///
/// The outcome is either the value returned by the task, the panic it raised
/// (`Error::TaskPanicked`), `Error::Discarded` if the pool dropped the task at
/// shutdown, or `Error::Stopped` if it was submitted to a stopped pool.
///
/// Use [`crate::ThreadPool::wait`] to block while helping the pool, or
/// [`TaskHandle::join`] to block without running any pool work.
pub struct TaskHandle<T> {
    id: TaskId,
    pool: Option<u64>,
    rx: Option<Receiver<Result<T>>>,
    outcome: Option<Result<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn channel(id: TaskId, pool: u64) -> (Sender<Result<T>>, Self) {
        let (tx, rx) = bounded(1);
        let handle = Self {
            id,
            pool: Some(pool),
            rx: Some(rx),
            outcome: None,
        };
        (tx, handle)
    }

    /// A handle whose outcome is already known.
    pub(crate) fn ready(id: TaskId, outcome: Result<T>) -> Self {
        Self {
            id,
            pool: None,
            rx: None,
            outcome: Some(outcome),
        }
    }

    pub(crate) fn failed(err: Error) -> Self {
        Self::ready(TaskId::next(), Err(err))
    }

    pub(crate) fn pool_id(&self) -> Option<u64> {
        self.pool
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Non-blocking completion check. Can be called any number of times.
    pub fn is_finished(&mut self) -> bool {
        if self.outcome.is_some() {
            return true;
        }

        let Some(rx) = &self.rx else {
            return false;
        };

        match rx.try_recv() {
            Ok(outcome) => self.outcome = Some(outcome),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => self.outcome = Some(Err(Error::Discarded)),
        }
        self.rx = None;
        true
    }

    /// Borrow the outcome if the task has finished.
    pub fn peek(&mut self) -> Option<&Result<T>> {
        if self.is_finished() {
            self.outcome.as_ref()
        } else {
            None
        }
    }

    /// Take the outcome if ready, otherwise hand the handle back.
    pub fn try_take(mut self) -> std::result::Result<Result<T>, Self> {
        if self.is_finished() {
            Ok(self.take_outcome())
        } else {
            Err(self)
        }
    }

    /// Block until the outcome is available, without helping the pool.
    pub fn join(mut self) -> Result<T> {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }

        match self.rx.take() {
            Some(rx) => rx.recv().unwrap_or(Err(Error::Discarded)),
            None => Err(Error::Discarded),
        }
    }

    /// Block for at most `timeout`. Returns whether the outcome is available.
    pub fn wait_timeout(&mut self, timeout: Duration) -> bool {
        if self.outcome.is_some() {
            return true;
        }

        let Some(rx) = &self.rx else {
            return false;
        };

        match rx.recv_timeout(timeout) {
            Ok(outcome) => self.outcome = Some(outcome),
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => self.outcome = Some(Err(Error::Discarded)),
        }
        self.rx = None;
        true
    }

    /// Caller must have seen `is_finished() == true`.
    pub(crate) fn take_outcome(&mut self) -> Result<T> {
        self.outcome.take().unwrap_or(Err(Error::Discarded))
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("ready", &self.outcome.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_ready_handle() {
        let mut handle = TaskHandle::ready(TaskId::next(), Ok(7));
        assert!(handle.is_finished());
        assert!(handle.is_finished());
        assert_eq!(handle.peek(), Some(&Ok(7)));
        assert_eq!(handle.join(), Ok(7));
    }

    #[test]
    fn test_channel_delivery() {
        let (tx, mut handle) = TaskHandle::channel(TaskId::next(), 1);
        assert!(!handle.is_finished());

        tx.send(Ok("value")).unwrap();
        assert!(handle.is_finished());
        // the sender is gone now but the stored value must stick
        drop(tx);
        assert!(handle.is_finished());
        assert_eq!(handle.join(), Ok("value"));
    }

    #[test]
    fn test_dropped_sender_means_discarded() {
        let (tx, mut handle) = TaskHandle::<u32>::channel(TaskId::next(), 1);
        drop(tx);
        assert!(handle.is_finished());
        assert_eq!(handle.join(), Err(Error::Discarded));
    }

    #[test]
    fn test_try_take_returns_handle_when_pending() {
        let (tx, handle) = TaskHandle::channel(TaskId::next(), 1);
        let handle = handle.try_take().unwrap_err();

        tx.send(Ok(1)).unwrap();
        assert_eq!(handle.try_take().unwrap(), Ok(1));
    }

    #[test]
    fn test_join_across_threads() {
        let (tx, handle) = TaskHandle::channel(TaskId::next(), 1);

        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            tx.send(Ok(99)).unwrap();
        });

        assert_eq!(handle.join(), Ok(99));
        sender.join().unwrap();
    }

    #[test]
    fn test_wait_timeout() {
        let (tx, mut handle) = TaskHandle::<u32>::channel(TaskId::next(), 1);
        assert!(!handle.wait_timeout(Duration::from_millis(5)));

        tx.send(Err(Error::TaskPanicked("boom".into()))).unwrap();
        assert!(handle.wait_timeout(Duration::from_millis(5)));
        assert_eq!(handle.join(), Err(Error::TaskPanicked("boom".into())));
    }
}
