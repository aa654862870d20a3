use std::sync::Arc;

use log::info;
use tokio::time::{sleep, Duration, Instant};

use crate::fetch::QuoteApi;

use super::budget::RateBudget;
use super::queue::{QueueEntry, TaskQueue};
use super::sink::ResultSink;
use super::strategy::ExecutionStrategy;

/// Slack added when sleeping out a closed window, so the recheck lands
/// strictly after the window boundary.
const WINDOW_SLACK: Duration = Duration::from_millis(1);

/// One consumer of the shared task queue with a private rate budget.
pub struct Worker {
    id: usize,
    budget: RateBudget,
    strategy: Box<dyn ExecutionStrategy>,
    queue: Arc<TaskQueue>,
    api: Arc<dyn QuoteApi>,
    sink: ResultSink,
}

impl Worker {
    pub fn new(
        id: usize,
        budget: RateBudget,
        strategy: Box<dyn ExecutionStrategy>,
        queue: Arc<TaskQueue>,
        api: Arc<dyn QuoteApi>,
        sink: ResultSink,
    ) -> Self {
        Self {
            id,
            budget,
            strategy,
            queue,
            api,
            sink,
        }
    }

    /// Pull symbols until the shutdown marker arrives, firing a batch
    /// whenever the rate window permits one. Every iteration services both
    /// the queue and the clock, so neither starves the other.
    pub async fn run(mut self) {
        info!(
            "[worker {}] started with limit of {} requests per {:?}",
            self.id,
            self.budget.max_requests(),
            self.budget.period()
        );

        let mut pending: Vec<String> = Vec::new();
        let mut shutdown_seen = false;

        while !pending.is_empty() || !shutdown_seen {
            if !shutdown_seen {
                match self.queue.take().await {
                    QueueEntry::Shutdown => shutdown_seen = true,
                    QueueEntry::Task(symbol) => pending.push(symbol),
                }
                self.queue.ack();
            }

            let admitted = self.budget.admit(&pending).len();
            if admitted > 0 {
                info!("[worker {}] handling {} requests", self.id, admitted);
                let started = Instant::now();
                self.strategy
                    .execute(&pending[..admitted], self.api.as_ref(), &self.sink)
                    .await;
                info!(
                    "[worker {}] completed {} requests after {:.2?}",
                    self.id,
                    admitted,
                    started.elapsed()
                );
                pending.drain(..admitted);
            } else if shutdown_seen && !pending.is_empty() {
                // The queue has nothing more for us; the only event left is
                // the window reopening, so sleep it out instead of spinning.
                sleep(self.budget.time_until_open() + WINDOW_SLACK).await;
            }
        }

        info!("[worker {}] finished", self.id);
    }
}
