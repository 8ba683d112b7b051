use crate::config::DatabaseConfig;
use crate::db::error::DatabaseError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    pub async fn new_with_options(
        database_url: &str,
        max_connections: u32,
        timeout_seconds: u64,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Connects with up to `attempts` tries, sleeping `delay` between failed
    /// tries. Exhausting every attempt is returned as
    /// [`DatabaseError::ConnectRetriesExhausted`] carrying the last error.
    pub async fn connect_with_retry(
        config: &DatabaseConfig,
        max_connections: u32,
        attempts: u32,
        delay: Duration,
    ) -> Result<Self, DatabaseError> {
        let database_url = config.database_url();
        let mut attempt = 0;

        loop {
            info!("Connecting to database [attempt {}] ...", attempt);

            match Self::new_with_options(
                &database_url,
                max_connections,
                config.acquire_timeout_seconds,
            )
            .await
            {
                Ok(pool) => return Ok(pool),
                Err(DatabaseError::Connection(e)) if attempt + 1 < attempts => {
                    warn!(error = %e, "Database connection attempt {} failed", attempt);
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(DatabaseError::Connection(e)) => {
                    return Err(DatabaseError::ConnectRetriesExhausted {
                        url: config.redacted_url(),
                        attempts: attempt + 1,
                        source: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
