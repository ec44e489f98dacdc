use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque on-chain address of a worker node
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerAddress(String);

impl WorkerAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WorkerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkerAddress({})", self.0)
    }
}

impl fmt::Display for WorkerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkerAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Hardware profile of a registered worker node
///
/// Owned by the external worker registry; immutable for the duration of a
/// selection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub address: WorkerAddress,

    /// Accelerator model identifier, e.g. "NVIDIA RTX 4090"
    pub accelerator_model: String,

    /// Accelerator memory capacity in GB
    pub memory_capacity: u64,

    pub core_count: u32,

    /// Host system memory in GB
    pub system_memory: u64,

    /// Region tag, e.g. "us-west"
    pub region: String,
}
