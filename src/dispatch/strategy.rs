use async_trait::async_trait;
use clap::ValueEnum;
use futures::future::join_all;

use crate::fetch::{classify, QuoteApi};

use super::sink::ResultSink;

/// How a worker issues the remote calls of one admitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One call at a time, in batch order.
    Sequential,
    /// All calls of the batch at once, awaited together.
    Concurrent,
}

impl Mode {
    pub fn strategy(self) -> Box<dyn ExecutionStrategy> {
        match self {
            Mode::Sequential => Box::new(SequentialStrategy),
            Mode::Concurrent => Box::new(ConcurrentStrategy),
        }
    }
}

/// Pluggable batch executor. Implementations must push exactly one record per
/// symbol in `batch`, and a failed call must never abort the rest.
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    async fn execute(&self, batch: &[String], api: &dyn QuoteApi, sink: &ResultSink);
}

/// Issues batch calls one after another; each record lands in the sink before
/// the next call starts.
pub struct SequentialStrategy;

#[async_trait]
impl ExecutionStrategy for SequentialStrategy {
    async fn execute(&self, batch: &[String], api: &dyn QuoteApi, sink: &ResultSink) {
        for symbol in batch {
            let response = api.query(symbol).await;
            sink.record(classify(symbol, &response));
        }
    }
}

/// Starts every call of the batch before awaiting any of them and returns
/// only once all have finished. Records still land in the sink as individual
/// calls complete.
pub struct ConcurrentStrategy;

#[async_trait]
impl ExecutionStrategy for ConcurrentStrategy {
    async fn execute(&self, batch: &[String], api: &dyn QuoteApi, sink: &ResultSink) {
        let calls = batch.iter().map(|symbol| async move {
            let response = api.query(symbol).await;
            sink.record(classify(symbol, &response));
        });
        join_all(calls).await;
    }
}
