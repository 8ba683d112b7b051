pub mod postgres;

pub use postgres::PgQueryExecutor;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Elapsed wall-clock time of one successful query, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LatencySample {
    pub micros: i64,
}

impl LatencySample {
    pub fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    pub fn from_duration(elapsed: Duration) -> Self {
        Self {
            micros: i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed retrieving row: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Other(String),
}

/// The store under test. Implementations must be safe to call from every
/// worker at once without external locking.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs the bucketed min/max aggregation for `partition_key` over the
    /// inclusive range and returns how long the call took.
    async fn execute(
        &self,
        partition_key: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<LatencySample, QueryError>;
}
