use async_trait::async_trait;
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Mutex;
use tokio::time::{sleep, Duration};
use tsdb_bench::executor::{LatencySample, QueryError, QueryExecutor};
use tsdb_bench::input::Task;
use tsdb_bench::pool::fnv1a_32;

pub const HEADER: &str = "hostname,start_time,end_time";

/// In-memory store that records every call in invocation order and returns
/// a latency derived only from the task itself.
#[derive(Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<Task>>,
    failing_keys: HashSet<String>,
    jitter: bool,
    delay: Option<Duration>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query for one of `keys` fails.
    pub fn failing(mut self, keys: &[&str]) -> Self {
        self.failing_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Sleeps a task-dependent amount before answering so workers interleave.
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    /// Sleeps `delay` before answering every query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Task> {
        self.calls.lock().unwrap().clone()
    }

    /// Range starts of every call for `key`, in invocation order.
    pub fn starts_for(&self, key: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|t| t.partition_key == key)
            .map(|t| t.range_start)
            .collect()
    }
}

/// Latency the scripted executor reports for a task, in microseconds.
pub fn scripted_latency(task: &Task) -> i64 {
    let fingerprint = format!(
        "{}|{}|{}",
        task.partition_key, task.range_start, task.range_end
    );
    i64::from(fnv1a_32(fingerprint.as_bytes()) % 50_000) + 1
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        partition_key: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<LatencySample, QueryError> {
        let task = Task::new(partition_key, range_start, range_end);
        self.calls.lock().unwrap().push(task.clone());

        let latency = scripted_latency(&task);
        if self.jitter {
            sleep(Duration::from_micros((latency % 400) as u64)).await;
        }
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        if self.failing_keys.contains(partition_key) {
            return Err(QueryError::Other(format!(
                "relation \"cpu_usage\" unavailable for {}",
                partition_key
            )));
        }

        Ok(LatencySample::from_micros(latency))
    }
}

pub fn csv_input(rows: &[Task]) -> Cursor<Vec<u8>> {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for task in rows {
        csv.push_str(&format!(
            "{},{},{}\n",
            task.partition_key, task.range_start, task.range_end
        ));
    }
    Cursor::new(csv.into_bytes())
}

/// `hosts * per_host` tasks, interleaved across hosts in input order.
pub fn interleaved_tasks(hosts: usize, per_host: usize) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(hosts * per_host);
    for minute in 0..per_host {
        for host in 0..hosts {
            tasks.push(Task::new(
                format!("host_{:06}", host),
                format!("2017-01-01 08:{:02}:00", minute),
                format!("2017-01-01 09:{:02}:00", minute),
            ));
        }
    }
    tasks
}
