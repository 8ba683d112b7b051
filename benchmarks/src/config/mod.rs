use crate::error::BenchmarkError;
use crate::evaluator::LatencyBenchmarkConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub workers: usize,
    pub queue_depth: usize,
    pub bucket_interval: String,
    pub connect_attempts: u32,
    pub connect_delay_secs: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_depth: 1,
            bucket_interval: "1 minute".to_string(),
            connect_attempts: 5,
            connect_delay_secs: 10,
        }
    }
}

impl BenchmarkConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: BenchmarkConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BenchmarkError> {
        if self.workers == 0 {
            return Err(BenchmarkError::InvalidWorkerCount(self.workers));
        }

        if self.queue_depth == 0 {
            return Err(BenchmarkError::InvalidConfig(
                "queue_depth must be at least 1".to_string(),
            ));
        }

        if self.connect_attempts == 0 {
            return Err(BenchmarkError::InvalidConfig(
                "connect_attempts must be at least 1".to_string(),
            ));
        }

        if self.bucket_interval.trim().is_empty() {
            return Err(BenchmarkError::InvalidConfig(
                "bucket_interval cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn latency_config(&self) -> LatencyBenchmarkConfig {
        LatencyBenchmarkConfig {
            workers: self.workers,
            queue_depth: self.queue_depth,
        }
    }
}
