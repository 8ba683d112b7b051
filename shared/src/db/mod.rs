pub mod error;
pub mod pool;

pub use error::DatabaseError;
pub use pool::DatabasePool;
