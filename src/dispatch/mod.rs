mod budget;
mod queue;
mod sink;
mod strategy;
mod worker;

pub use budget::RateBudget;
pub use queue::{QueueEntry, TaskQueue};
pub use sink::{result_channel, ResultHarvest, ResultSink};
pub use strategy::{ConcurrentStrategy, ExecutionStrategy, Mode, SequentialStrategy};
pub use worker::Worker;

use std::sync::Arc;

use log::info;
use tokio::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::fetch::{QuoteApi, QuoteRecord};

/// Tuning for one dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub mode: Mode,
    pub num_requests: usize,
    pub max_requests_per_period: u32,
    pub period: Duration,
    pub num_workers: usize,
}

/// Outcome of a run, already partitioned for reporting.
#[derive(Debug)]
pub struct DispatchReport {
    pub successes: Vec<QuoteRecord>,
    pub failures: Vec<QuoteRecord>,
    pub elapsed: Duration,
}

/// Split a global allowance as evenly as possible, handing the remainder to
/// the lowest worker indices. The parts always sum to `global_limit` and
/// differ by at most one.
pub fn split_rate_limit(global_limit: u32, num_workers: usize) -> Vec<usize> {
    let base = global_limit as usize / num_workers;
    let leftover = global_limit as usize - base * num_workers;
    (0..num_workers)
        .map(|idx| if idx < leftover { base + 1 } else { base })
        .collect()
}

/// Run the whole pipeline: spawn workers, feed the queue, wait for it to
/// drain, then harvest exactly one record per enqueued symbol.
pub async fn run(
    symbols: &[String],
    options: &DispatchOptions,
    api: Arc<dyn QuoteApi>,
) -> Result<DispatchReport> {
    let started = Instant::now();

    if options.max_requests_per_period == 0 {
        return Err(AppError::message("max_requests_per_period must be at least 1"));
    }

    // A worker with a zero allowance would accept symbols it can never
    // execute, so never run more workers than there are request slots.
    let num_workers = options
        .num_workers
        .clamp(1, options.max_requests_per_period as usize);

    info!(
        "[dispatcher] performing up to {} requests with {} workers",
        options.num_requests, num_workers
    );
    info!(
        "[dispatcher] obeying rate limit of {} requests per {:?} window",
        options.max_requests_per_period, options.period
    );

    let queue = Arc::new(TaskQueue::new());
    let (sink, mut harvest) = result_channel();

    let allowances = split_rate_limit(options.max_requests_per_period, num_workers);
    let mut handles = Vec::with_capacity(num_workers);
    for (id, allowance) in allowances.into_iter().enumerate() {
        let worker = Worker::new(
            id,
            RateBudget::new(allowance, options.period),
            options.mode.strategy(),
            Arc::clone(&queue),
            Arc::clone(&api),
            sink.clone(),
        );
        handles.push(tokio::spawn(worker.run()));
    }
    drop(sink);

    // The expected record count is what actually goes on the queue, never
    // the requested count, so a short symbol list cannot stall the harvest.
    let enqueued = symbols.len().min(options.num_requests);
    for symbol in &symbols[..enqueued] {
        queue.put(QueueEntry::Task(symbol.clone()));
    }
    for _ in 0..num_workers {
        queue.put(QueueEntry::Shutdown);
    }
    info!("[dispatcher] {} tasks queued", enqueued);

    queue.wait_drained().await;

    let records = harvest.collect(enqueued).await;
    for handle in handles {
        handle.await?;
    }

    let (failures, successes): (Vec<_>, Vec<_>) =
        records.into_iter().partition(QuoteRecord::is_failure);

    Ok(DispatchReport {
        successes,
        failures,
        elapsed: started.elapsed(),
    })
}
