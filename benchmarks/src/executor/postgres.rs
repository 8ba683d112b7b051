use super::{LatencySample, QueryError, QueryExecutor};
use async_trait::async_trait;
use shared::DatabasePool;
use std::time::Instant;
use tracing::debug;

const BUCKETED_MIN_MAX_QUERY: &str = r#"
SELECT time_bucket($4::interval, ts) AS bucket,
       MIN(usage) AS min_usage,
       MAX(usage) AS max_usage
FROM cpu_usage
WHERE host = $1 AND ts >= $2::timestamptz AND ts <= $3::timestamptz
GROUP BY host, bucket
"#;

pub struct PgQueryExecutor {
    db_pool: DatabasePool,
    bucket_interval: String,
}

impl PgQueryExecutor {
    pub fn new(db_pool: DatabasePool, bucket_interval: impl Into<String>) -> Self {
        Self {
            db_pool,
            bucket_interval: bucket_interval.into(),
        }
    }
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn execute(
        &self,
        partition_key: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<LatencySample, QueryError> {
        let start = Instant::now();

        // The whole result is consumed before returning and only the first
        // bucket is kept; an empty result counts as a failure.
        let _row = sqlx::query(BUCKETED_MIN_MAX_QUERY)
            .bind(partition_key)
            .bind(range_start)
            .bind(range_end)
            .bind(&self.bucket_interval)
            .fetch_one(self.db_pool.pool())
            .await?;

        let sample = LatencySample::from_duration(start.elapsed());
        debug!(
            partition_key,
            latency_us = sample.micros,
            "Bucketed min/max query completed"
        );

        Ok(sample)
    }
}
