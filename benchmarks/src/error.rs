use thiserror::Error;

/// Errors that abort a whole benchmark run. None of these produce a partial
/// report.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Error when reading CSV header: input is empty")]
    MissingHeader,

    #[error("Failed parsing CSV input at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Input error: {0}")]
    Input(#[from] std::io::Error),

    #[error("workers must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Run aborted before all workers finished")]
    Aborted,

    #[error("Benchmark task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
