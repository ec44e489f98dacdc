use crate::error::{QuotaError, Result};
use meridian_types::{QuotaSnapshot, WorkerAddress};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct LedgerState {
    epoch: u64,
    version: u64,
    used: HashMap<WorkerAddress, f64>,
}

/// In-memory per-epoch capacity ledger.
///
/// Tracks the fraction of total epoch capacity each worker has consumed.
/// The selection core reads immutable [`QuotaSnapshot`]s; all writes go
/// through this tracker, which serializes them behind a single lock.
/// `version` increments on every write so callers can choose between a
/// single-writer discipline ([`record`](QuotaTracker::record)) and
/// optimistic concurrency ([`try_record`](QuotaTracker::try_record)).
pub struct QuotaTracker {
    state: Arc<RwLock<LedgerState>>,
    max_quota: f64,
}

impl QuotaTracker {
    pub fn new(max_quota: f64) -> Result<Self> {
        if !(max_quota > 0.0 && max_quota <= 1.0) {
            return Err(QuotaError::InvalidConfiguration(format!(
                "max_quota must be in (0, 1], got {}",
                max_quota
            )));
        }

        Ok(Self {
            state: Arc::new(RwLock::new(LedgerState {
                epoch: 0,
                version: 0,
                used: HashMap::new(),
            })),
            max_quota,
        })
    }

    pub fn max_quota(&self) -> f64 {
        self.max_quota
    }

    /// Point-in-time consistent view of the ledger
    pub async fn snapshot(&self) -> QuotaSnapshot {
        let state = self.state.read().await;
        QuotaSnapshot {
            epoch: state.epoch,
            version: state.version,
            used: state.used.clone(),
        }
    }

    pub async fn usage(&self, worker: &WorkerAddress) -> f64 {
        let state = self.state.read().await;
        state.used.get(worker).copied().unwrap_or(0.0)
    }

    pub async fn current_epoch(&self) -> u64 {
        self.state.read().await.epoch
    }

    /// Charge `cost` capacity to a worker under a single-writer discipline.
    ///
    /// Returns the worker's new usage. Fails without mutating when the
    /// charge would push the worker past `max_quota`.
    pub async fn record(&self, worker: &WorkerAddress, cost: f64) -> Result<f64> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(QuotaError::InvalidCost(cost));
        }

        let mut state = self.state.write().await;
        let used = state.used.get(worker).copied().unwrap_or(0.0);
        let new_used = used + cost;

        if new_used > self.max_quota {
            return Err(QuotaError::QuotaExceeded {
                worker: worker.clone(),
                used: new_used,
                max: self.max_quota,
            });
        }

        state.used.insert(worker.clone(), new_used);
        state.version += 1;

        debug!(
            worker = %worker,
            used = new_used,
            version = state.version,
            "Quota charged"
        );

        Ok(new_used)
    }

    /// Optimistic variant of [`record`](QuotaTracker::record).
    ///
    /// Fails with [`QuotaError::VersionConflict`] when the ledger has moved
    /// since `expected_version` was snapshotted; the caller re-snapshots,
    /// re-scores, and retries.
    pub async fn try_record(
        &self,
        expected_version: u64,
        worker: &WorkerAddress,
        cost: f64,
    ) -> Result<f64> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(QuotaError::InvalidCost(cost));
        }

        let mut state = self.state.write().await;
        if state.version != expected_version {
            return Err(QuotaError::VersionConflict {
                expected: expected_version,
                actual: state.version,
            });
        }

        let used = state.used.get(worker).copied().unwrap_or(0.0);
        let new_used = used + cost;

        if new_used > self.max_quota {
            return Err(QuotaError::QuotaExceeded {
                worker: worker.clone(),
                used: new_used,
                max: self.max_quota,
            });
        }

        state.used.insert(worker.clone(), new_used);
        state.version += 1;

        Ok(new_used)
    }

    /// Reset all usage at an epoch boundary
    pub async fn roll_epoch(&self, epoch: u64) {
        let mut state = self.state.write().await;
        let cleared = state.used.len();
        state.used.clear();
        state.epoch = epoch;
        state.version += 1;

        info!(epoch, cleared, "📊 Quota ledger rolled to new epoch");
    }
}

impl Clone for QuotaTracker {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            max_quota: self.max_quota,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_snapshot() {
        let tracker = QuotaTracker::new(0.125).unwrap();
        let worker = WorkerAddress::from("0x1111");

        assert_eq!(tracker.usage(&worker).await, 0.0);

        tracker.record(&worker, 0.05).await.unwrap();
        let used = tracker.record(&worker, 0.05).await.unwrap();
        assert!((used - 0.1).abs() < 1e-12);

        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.version, 2);
        assert!((snapshot.usage(&worker) - 0.1).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_quota_ceiling_enforced() {
        let tracker = QuotaTracker::new(0.125).unwrap();
        let worker = WorkerAddress::from("0x1111");

        tracker.record(&worker, 0.1).await.unwrap();
        let err = tracker.record(&worker, 0.05).await.unwrap_err();
        assert!(matches!(err, QuotaError::QuotaExceeded { .. }));

        // Failed charge must not mutate the ledger
        assert!((tracker.usage(&worker).await - 0.1).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_optimistic_conflict() {
        let tracker = QuotaTracker::new(0.5).unwrap();
        let alice = WorkerAddress::from("0xaaaa");
        let bob = WorkerAddress::from("0xbbbb");

        let snapshot = tracker.snapshot().await;

        // A concurrent writer moves the ledger first
        tracker.record(&bob, 0.1).await.unwrap();

        let err = tracker
            .try_record(snapshot.version, &alice, 0.1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuotaError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));

        // Retry against a fresh snapshot succeeds
        let fresh = tracker.snapshot().await;
        tracker.try_record(fresh.version, &alice, 0.1).await.unwrap();
    }

    #[tokio::test]
    async fn test_epoch_rollover_resets_usage() {
        let tracker = QuotaTracker::new(0.125).unwrap();
        let worker = WorkerAddress::from("0x1111");

        tracker.record(&worker, 0.12).await.unwrap();
        tracker.roll_epoch(1).await;

        assert_eq!(tracker.current_epoch().await, 1);
        assert_eq!(tracker.usage(&worker).await, 0.0);

        // Fresh epoch, fresh capacity
        tracker.record(&worker, 0.12).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_invalid_bounds() {
        assert!(QuotaTracker::new(0.0).is_err());
        assert!(QuotaTracker::new(1.5).is_err());

        let tracker = QuotaTracker::new(0.125).unwrap();
        let worker = WorkerAddress::from("0x1111");
        assert!(matches!(
            tracker.record(&worker, -0.1).await.unwrap_err(),
            QuotaError::InvalidCost(_)
        ));
        assert!(matches!(
            tracker.record(&worker, f64::NAN).await.unwrap_err(),
            QuotaError::InvalidCost(_)
        ));
    }
}
