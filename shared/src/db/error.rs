use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Unable to connect to {url} after {attempts} attempts: {source}")]
    ConnectRetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },
}
