use crate::worker::WorkerAddress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time view of the per-epoch quota ledger.
///
/// Values are the fraction of total epoch capacity each worker has already
/// consumed, in [0, max_quota]. The selection core only reads this; the
/// ledger owner resets usage at every epoch boundary and bumps `version` on
/// every write so callers can run optimistic commit loops against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub epoch: u64,
    pub version: u64,
    pub used: HashMap<WorkerAddress, f64>,
}

impl QuotaSnapshot {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            version: 0,
            used: HashMap::new(),
        }
    }

    /// Consumed capacity for a worker; absent entries have used nothing yet.
    pub fn usage(&self, worker: &WorkerAddress) -> f64 {
        self.used.get(worker).copied().unwrap_or(0.0)
    }

    pub fn with_usage(mut self, worker: impl Into<WorkerAddress>, used: f64) -> Self {
        self.used.insert(worker.into(), used);
        self
    }
}
