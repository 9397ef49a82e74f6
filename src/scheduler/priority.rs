use crate::executor::task::Task;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct QueuedTask {
    task: Task,
    seq: u64,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.task.priority == other.task.priority && self.seq == other.seq
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // max-heap: higher priority first, then earlier submission
        self.task
            .priority
            .cmp(&other.task.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending tasks ordered by priority, FIFO among equal priorities.
///
/// Not synchronized on its own: the pool keeps it behind the same mutex its
/// condition variable waits on.
#[derive(Debug, Default)]
pub(crate) struct TaskStore {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedTask { task, seq });
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.heap.pop().map(|queued| queued.task)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remove every pending task, in no particular order.
    pub fn drain(&mut self) -> Vec<Task> {
        self.heap.drain().map(|queued| queued.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::task::{Priority, TaskId};

    fn dummy_task(priority: Priority) -> Task {
        Task::new(TaskId::next(), priority, |_, _| {})
    }

    #[test]
    fn test_priority_ordering() {
        let mut store = TaskStore::new();

        store.push(dummy_task(1));
        store.push(dummy_task(10));
        store.push(dummy_task(-4));
        store.push(dummy_task(5));

        assert_eq!(store.pop().map(|t| t.priority), Some(10));
        assert_eq!(store.pop().map(|t| t.priority), Some(5));
        assert_eq!(store.pop().map(|t| t.priority), Some(1));
        assert_eq!(store.pop().map(|t| t.priority), Some(-4));
        assert!(store.pop().is_none());
    }

    #[test]
    fn test_equal_priority_is_fifo() {
        let mut store = TaskStore::new();
        let ids: Vec<TaskId> = (0..8)
            .map(|_| {
                let task = dummy_task(2);
                let id = task.id;
                store.push(task);
                id
            })
            .collect();

        let popped: Vec<TaskId> = std::iter::from_fn(|| store.pop().map(|t| t.id)).collect();
        assert_eq!(popped, ids);
    }

    #[test]
    fn test_fifo_within_mixed_priorities() {
        let mut store = TaskStore::new();
        let low_a = dummy_task(0);
        let high = dummy_task(3);
        let low_b = dummy_task(0);
        let (a, h, b) = (low_a.id, high.id, low_b.id);

        store.push(low_a);
        store.push(high);
        store.push(low_b);

        assert_eq!(store.pop().map(|t| t.id), Some(h));
        assert_eq!(store.pop().map(|t| t.id), Some(a));
        assert_eq!(store.pop().map(|t| t.id), Some(b));
    }

    #[test]
    fn test_drain_empties_store() {
        let mut store = TaskStore::new();
        for p in 0..5 {
            store.push(dummy_task(p));
        }
        assert_eq!(store.len(), 5);

        let drained = store.drain();
        assert_eq!(drained.len(), 5);
        assert_eq!(store.len(), 0);
        assert!(store.pop().is_none());
    }
}
