use super::partition::worker_index;
use super::worker::{Worker, WorkerReport};
use crate::error::{BenchmarkError, Result};
use crate::executor::{LatencySample, QueryExecutor};
use crate::input::{Task, TaskReader};
use futures::future::join_all;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// N workers, each behind its own bounded task queue.
pub struct WorkerPool {
    queues: Vec<mpsc::Sender<Task>>,
    handles: Vec<JoinHandle<WorkerReport>>,
}

impl WorkerPool {
    /// Spawns `size` workers on the current runtime. Every worker shares
    /// `executor` and publishes into `results`.
    pub fn spawn(
        executor: Arc<dyn QueryExecutor>,
        size: usize,
        queue_depth: usize,
        results: mpsc::UnboundedSender<LatencySample>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(BenchmarkError::InvalidWorkerCount(size));
        }
        if queue_depth == 0 {
            return Err(BenchmarkError::InvalidConfig(
                "queue_depth must be at least 1".to_string(),
            ));
        }

        let mut queues = Vec::with_capacity(size);
        let mut handles = Vec::with_capacity(size);

        for id in 0..size {
            let (tx, rx) = mpsc::channel(queue_depth);
            let worker = Worker::new(id, rx, results.clone(), executor.clone());
            queues.push(tx);
            handles.push(tokio::spawn(worker.run()));
        }

        Ok(Self { queues, handles })
    }

    pub fn size(&self) -> usize {
        self.queues.len()
    }

    /// Routes `task` to the worker owning its partition key, blocking while
    /// that worker's queue is full. Must be called off the async runtime.
    pub fn blocking_submit(&self, task: Task) -> Result<usize> {
        let index = worker_index(&task.partition_key, self.size());
        self.queues[index]
            .blocking_send(task)
            .map_err(|_| BenchmarkError::Aborted)?;
        Ok(index)
    }

    /// Closes every queue and waits for every worker to terminate.
    pub async fn shutdown(self) -> Result<Vec<WorkerReport>> {
        drop(self.queues);

        let mut reports = Vec::with_capacity(self.handles.len());
        for joined in join_all(self.handles).await {
            reports.push(joined?);
        }
        Ok(reports)
    }

    /// Closes every queue and cancels the workers without draining what is
    /// still queued. Returns once every worker task has stopped.
    pub async fn abort(self) {
        drop(self.queues);

        for handle in &self.handles {
            handle.abort();
        }
        join_all(self.handles).await;
    }
}

/// Feeds input records to the pool and owns its shutdown.
pub struct Dispatcher {
    pool: WorkerPool,
}

impl Dispatcher {
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }

    /// Reads every task from `input` and hands it to its worker, in input
    /// order. Blocks on I/O and on full queues, so run it on a blocking
    /// thread. Returns the number of tasks dispatched.
    pub fn dispatch<R: Read>(&self, input: R) -> Result<usize> {
        let mut dispatched = 0;

        for task in TaskReader::new(input)? {
            let task = task.inspect_err(|e| error!(error = %e, "Aborting dispatch"))?;
            self.pool.blocking_submit(task)?;
            dispatched += 1;
        }

        info!("Reached end of input after {} tasks", dispatched);
        Ok(dispatched)
    }

    /// Closes all worker queues, waits for every worker to finish and only
    /// then fires `done`, so every sample is published before completion.
    pub async fn finish(self, done: oneshot::Sender<()>) -> Result<Vec<WorkerReport>> {
        info!("Waiting for workers to shutdown...");
        let reports = self.pool.shutdown().await?;

        // The collector may already be gone if the run is being torn down.
        let _ = done.send(());
        Ok(reports)
    }

    /// Tears the pool down after a failed dispatch. Queued tasks are dropped.
    pub async fn abort(self) {
        warn!("Cancelling workers after failed dispatch");
        self.pool.abort().await;
    }
}
