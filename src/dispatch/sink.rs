use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::fetch::QuoteRecord;

/// Build the shared record channel: one clonable sink per worker, one harvest
/// end for the dispatcher.
pub fn result_channel() -> (ResultSink, ResultHarvest) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ResultSink { tx }, ResultHarvest { rx })
}

/// Producer half handed to every worker.
#[derive(Clone)]
pub struct ResultSink {
    tx: UnboundedSender<QuoteRecord>,
}

impl ResultSink {
    /// Push one record. The harvest end only closes when a run is abandoned,
    /// in which case dropping the record is harmless.
    pub fn record(&self, record: QuoteRecord) {
        if self.tx.send(record).is_err() {
            log::warn!("result sink closed; dropping record");
        }
    }
}

/// Consumer half kept by the dispatcher.
pub struct ResultHarvest {
    rx: UnboundedReceiver<QuoteRecord>,
}

impl ResultHarvest {
    /// Read exactly `count` records, blocking until all have arrived.
    pub async fn collect(&mut self, count: usize) -> Vec<QuoteRecord> {
        let mut records = Vec::with_capacity(count);
        while records.len() < count {
            match self.rx.recv().await {
                Some(record) => records.push(record),
                None => break,
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_exactly_the_requested_count() {
        let (sink, mut harvest) = result_channel();
        for i in 0..3 {
            sink.record(QuoteRecord::success("AAPL", f64::from(i), "Apple Inc."));
        }

        let records = harvest.collect(2).await;
        assert_eq!(records.len(), 2);
        assert!((records[0].value - 0.0).abs() < f64::EPSILON);
        assert!((records[1].value - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn collect_stops_when_all_sinks_are_gone() {
        let (sink, mut harvest) = result_channel();
        sink.record(QuoteRecord::failure("AAPL", "FAILED 500"));
        drop(sink);

        let records = harvest.collect(5).await;
        assert_eq!(records.len(), 1);
    }
}
