use crate::executor::{LatencySample, QueryExecutor};
use crate::input::Task;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What a worker did before it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Serially executes the tasks of one queue.
///
/// Tasks arrive in dispatch order and are executed one at a time, so all
/// queries for a key routed here run in input order.
pub struct Worker {
    id: usize,
    tasks: mpsc::Receiver<Task>,
    results: mpsc::UnboundedSender<LatencySample>,
    executor: Arc<dyn QueryExecutor>,
}

impl Worker {
    pub fn new(
        id: usize,
        tasks: mpsc::Receiver<Task>,
        results: mpsc::UnboundedSender<LatencySample>,
        executor: Arc<dyn QueryExecutor>,
    ) -> Self {
        Self {
            id,
            tasks,
            results,
            executor,
        }
    }

    /// Runs until the queue is closed and drained.
    pub async fn run(mut self) -> WorkerReport {
        info!("Starting worker {}", self.id);

        let mut report = WorkerReport {
            id: self.id,
            succeeded: 0,
            failed: 0,
        };

        while let Some(task) = self.tasks.recv().await {
            let outcome = self
                .executor
                .execute(&task.partition_key, &task.range_start, &task.range_end)
                .await;

            match outcome {
                Ok(sample) => {
                    debug!(
                        worker = self.id,
                        partition_key = %task.partition_key,
                        latency_us = sample.micros,
                        "Query completed"
                    );
                    if self.results.send(sample).is_err() {
                        warn!(worker = self.id, "Result stream closed, stopping worker");
                        break;
                    }
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!(
                        worker = self.id,
                        partition_key = %task.partition_key,
                        range_start = %task.range_start,
                        range_end = %task.range_end,
                        error = %e,
                        "Query failed, skipping task"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            "Worker {} finished: {} succeeded, {} failed",
            report.id, report.succeeded, report.failed
        );
        report
    }
}
