//! Concurrent latency benchmark for a time-bucketed min/max aggregation.
//!
//! CSV records are routed to a fixed pool of workers by hashing their
//! partition key, executed against the store, and the latencies of the
//! successful queries are folded into summary statistics.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod input;
pub mod pool;

pub use error::{BenchmarkError, Result};
