pub mod config;
pub mod db;
pub mod telemetry;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{DatabaseError, DatabasePool};
