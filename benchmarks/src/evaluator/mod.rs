pub mod collector;
pub mod latency_benchmark;
pub mod metrics;

pub use collector::*;
pub use latency_benchmark::*;
pub use metrics::*;
