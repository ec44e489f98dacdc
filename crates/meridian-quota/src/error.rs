use meridian_types::WorkerAddress;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuotaError {
    #[error("Quota exceeded for {worker}: used {used}, max {max}")]
    QuotaExceeded {
        worker: WorkerAddress,
        used: f64,
        max: f64,
    },

    #[error("Ledger version conflict: expected {expected}, actual {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid capacity cost: {0}")]
    InvalidCost(f64),
}

pub type Result<T> = std::result::Result<T, QuotaError>;
