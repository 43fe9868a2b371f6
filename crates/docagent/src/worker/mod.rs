pub mod job;
pub mod pool;
pub mod scanner;

pub use job::{IngestJob, IngestJobResult, JobStatus};
pub use pool::WorkerPool;
pub use scanner::DirectoryScanner;
