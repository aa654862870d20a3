use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;

/// One slot of the shared work queue: a symbol to look up, or the shutdown
/// marker telling exactly one worker that no more symbols are coming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEntry {
    Task(String),
    Shutdown,
}

/// Shared FIFO with joinable-queue semantics: every entry that is `put` must
/// be taken and then acked before `wait_drained` resolves. This is the only
/// channel through which global completion is detected.
pub struct TaskQueue {
    entries: Mutex<VecDeque<QueueEntry>>,
    available: Notify,
    outstanding: AtomicUsize,
    drained: Notify,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            outstanding: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Enqueue without blocking. FIFO order is preserved across consumers.
    pub fn put(&self, entry: QueueEntry) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        self.entries.lock().unwrap().push_back(entry);
        self.available.notify_one();
    }

    /// Block until an entry is available. The caller must `ack` every entry
    /// it takes, or `wait_drained` will never resolve.
    pub async fn take(&self) -> QueueEntry {
        let notified = self.available.notified();
        tokio::pin!(notified);
        loop {
            notified.as_mut().enable();
            if let Some(entry) = self.entries.lock().unwrap().pop_front() {
                return entry;
            }
            notified.as_mut().await;
            notified.set(self.available.notified());
        }
    }

    /// Acknowledge one previously taken entry.
    pub fn ack(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Block until every entry ever put has been taken and acked.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            if self.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::{sleep, timeout, Duration};

    use super::*;

    #[tokio::test]
    async fn preserves_fifo_order() {
        let queue = TaskQueue::new();
        queue.put(QueueEntry::Task("a".into()));
        queue.put(QueueEntry::Task("b".into()));
        queue.put(QueueEntry::Shutdown);

        assert_eq!(queue.take().await, QueueEntry::Task("a".into()));
        queue.ack();
        assert_eq!(queue.take().await, QueueEntry::Task("b".into()));
        queue.ack();
        assert_eq!(queue.take().await, QueueEntry::Shutdown);
        queue.ack();
        queue.wait_drained().await;
    }

    #[tokio::test]
    async fn take_waits_for_a_late_put() {
        let queue = Arc::new(TaskQueue::new());
        let taker = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.take().await })
        };

        tokio::task::yield_now().await;
        queue.put(QueueEntry::Task("late".into()));

        assert_eq!(taker.await.unwrap(), QueueEntry::Task("late".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_drained_blocks_until_every_entry_is_acked() {
        let queue = Arc::new(TaskQueue::new());
        queue.put(QueueEntry::Task("a".into()));
        queue.put(QueueEntry::Shutdown);

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                let _ = queue.take().await;
                queue.ack();
                let _ = queue.take().await;
                // Hold the final ack back so the drain has to wait for it.
                sleep(Duration::from_secs(1)).await;
                queue.ack();
            })
        };

        assert!(
            timeout(Duration::from_millis(500), queue.wait_drained())
                .await
                .is_err(),
            "drained before the last entry was acked"
        );
        queue.wait_drained().await;
        consumer.await.unwrap();
    }
}
