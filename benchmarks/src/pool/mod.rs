pub mod dispatcher;
pub mod partition;
pub mod worker;

pub use dispatcher::{Dispatcher, WorkerPool};
pub use partition::{fnv1a_32, worker_index};
pub use worker::{Worker, WorkerReport};
