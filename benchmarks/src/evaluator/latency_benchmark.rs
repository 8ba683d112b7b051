use super::collector::Collector;
use super::metrics::AggregateStats;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::pool::{Dispatcher, WorkerPool, WorkerReport};
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyBenchmarkConfig {
    pub workers: usize,
    pub queue_depth: usize,
}

impl Default for LatencyBenchmarkConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_depth: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyBenchmarkResult {
    pub stats: AggregateStats,
    pub dispatched: usize,
    pub workers: Vec<WorkerReport>,
    pub total_duration: Duration,
}

impl LatencyBenchmarkResult {
    pub fn failed(&self) -> usize {
        self.workers.iter().map(|w| w.failed).sum()
    }
}

pub struct LatencyBenchmark {
    executor: Arc<dyn QueryExecutor>,
    config: LatencyBenchmarkConfig,
}

impl LatencyBenchmark {
    pub fn new(executor: Arc<dyn QueryExecutor>, config: LatencyBenchmarkConfig) -> Self {
        Self { executor, config }
    }

    /// Runs every task in `input` through the worker pool and aggregates the
    /// latencies of the successful ones.
    ///
    /// Malformed input aborts the run with no statistics; queries that fail
    /// are logged by their worker and left out of the statistics.
    pub async fn run<R>(&self, input: R) -> Result<LatencyBenchmarkResult>
    where
        R: Read + Send + 'static,
    {
        info!(
            "Starting latency benchmark: workers={}, queue_depth={}",
            self.config.workers, self.config.queue_depth
        );
        let start_time = Instant::now();

        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();

        let pool = WorkerPool::spawn(
            self.executor.clone(),
            self.config.workers,
            self.config.queue_depth,
            results_tx,
        )?;
        let collector = tokio::spawn(Collector::new(results_rx, done_rx).run());

        let dispatcher = Dispatcher::new(pool);
        let (dispatcher, dispatched) = tokio::task::spawn_blocking(move || {
            let dispatched = dispatcher.dispatch(input);
            (dispatcher, dispatched)
        })
        .await?;

        let dispatched = match dispatched {
            Ok(dispatched) => dispatched,
            Err(e) => {
                dispatcher.abort().await;
                collector.abort();
                let _ = collector.await;
                return Err(e);
            }
        };

        let workers = dispatcher.finish(done_tx).await?;
        let stats = collector.await??;
        let total_duration = start_time.elapsed();

        let result = LatencyBenchmarkResult {
            stats,
            dispatched,
            workers,
            total_duration,
        };

        let failed = result.failed();
        if failed > 0 {
            warn!("{} queries failed during benchmark", failed);
        }
        info!(
            "Benchmark completed: {} dispatched, {} successful, {:.2}s total",
            result.dispatched,
            result.stats.count,
            total_duration.as_secs_f64()
        );

        Ok(result)
    }
}
