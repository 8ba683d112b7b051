use super::metrics::{AggregateStats, StatsAccumulator};
use crate::error::{BenchmarkError, Result};
use crate::executor::LatencySample;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Fan-in end of the result stream.
///
/// Consumes samples until the completion signal fires. The result stream is
/// polled first on every wake-up, so a sample sent before completion is
/// always consumed before the loop exits.
pub struct Collector {
    results: mpsc::UnboundedReceiver<LatencySample>,
    done: oneshot::Receiver<()>,
}

impl Collector {
    pub fn new(
        results: mpsc::UnboundedReceiver<LatencySample>,
        done: oneshot::Receiver<()>,
    ) -> Self {
        Self { results, done }
    }

    pub async fn run(self) -> Result<AggregateStats> {
        let Collector {
            mut results,
            mut done,
        } = self;
        let mut stats = StatsAccumulator::new();

        loop {
            tokio::select! {
                biased;

                Some(sample) = results.recv() => {
                    stats.record(sample);
                }
                signal = &mut done => {
                    if signal.is_err() {
                        warn!(
                            "Completion signal dropped after {} results, aborting collection",
                            stats.count()
                        );
                        return Err(BenchmarkError::Aborted);
                    }
                    info!("Gathered all results");
                    break;
                }
            }
        }

        let stats = stats.finalize();
        if stats.is_empty() {
            warn!("No query completed successfully, reporting empty statistics");
        }
        Ok(stats)
    }
}
