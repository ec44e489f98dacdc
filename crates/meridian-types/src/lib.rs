pub mod error;
pub mod job;
pub mod quota;
pub mod stats;
pub mod worker;

pub use error::{Result, SelectionError};
pub use job::JobRequest;
pub use quota::QuotaSnapshot;
pub use stats::{PerformanceSnapshot, NEUTRAL_PRIOR};
pub use worker::{WorkerAddress, WorkerProfile};
