pub mod batch;
pub mod pool;

pub use batch::{estimate_many, summarize_record};
pub use pool::WorkerPool;
