use crate::config::SelectionConfig;
use meridian_types::{JobRequest, PerformanceSnapshot, QuotaSnapshot, WorkerAddress, WorkerProfile};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Absolute ceiling on the fairness factor after the newcomer boost
const FAIRNESS_CEILING: f64 = 1.2;

/// Per-worker score breakdown for one job.
///
/// Ephemeral: derived during a selection call, carried into the audit
/// trace, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerScore {
    pub worker: WorkerProfile,
    pub suitability: f64,
    pub performance: f64,
    pub fairness: f64,
    pub total: f64,
}

/// Pure multi-factor scoring of workers against a job.
///
/// Stateless: every method is a function of its arguments and the two
/// configured bounds. `total = suitability * performance * fairness`.
#[derive(Debug)]
pub struct ScoringEngine {
    max_quota: f64,
    newcomer_boost: f64,
}

impl ScoringEngine {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            max_quota: config.max_quota,
            newcomer_boost: config.newcomer_boost,
        }
    }

    /// Hardware fit between a worker and a job, in [1.0, 1.452].
    ///
    /// Bonuses are independent and multiplicative. Model and region
    /// identifiers are compared as exact strings, no partial matching.
    pub fn suitability(&self, worker: &WorkerProfile, job: &JobRequest) -> f64 {
        let mut score = 1.0;

        if job.requires_accelerator() && worker.accelerator_model == job.accelerator_model {
            score *= 1.2;
        }

        if worker.memory_capacity >= job.min_memory {
            score *= 1.1;
        }

        if let Some(region) = &job.region {
            if &worker.region == region {
                score *= 1.1;
            }
        }

        score
    }

    /// Historical merit in [0, 1]: weighted average of proof pass rate,
    /// data-availability reliability and uptime. Unknown metrics resolve to
    /// the neutral prior before weighting.
    pub fn performance(&self, stats: &PerformanceSnapshot) -> f64 {
        0.4 * stats.proof_pass_rate_or_default()
            + 0.3 * stats.availability_or_default()
            + 0.3 * stats.uptime_or_default()
    }

    /// Anti-monopoly factor driven by epoch quota utilization.
    ///
    /// Flat at 1.0 below half utilization, decays linearly to 0.85 up to
    /// 80%, then drops to a hard 0.1 cliff. Newcomers get an additive
    /// boost capped at an absolute 1.2.
    pub fn fairness(&self, quota_used: f64, is_newcomer: bool) -> f64 {
        let utilization = quota_used / self.max_quota;

        let mut score = if utilization < 0.5 {
            1.0
        } else if utilization < 0.8 {
            1.0 - (utilization - 0.5) * 0.5
        } else {
            0.1
        };

        if is_newcomer {
            score = (score + self.newcomer_boost).min(FAIRNESS_CEILING);
        }

        score
    }

    /// Score every quota-eligible worker and rank by total, descending.
    ///
    /// Workers at or past `max_quota` are excluded outright. The sort is
    /// stable: equal totals keep their roster order, so re-running the same
    /// inputs reproduces the same ranking for auditors.
    pub fn score_workers(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
    ) -> Vec<WorkerScore> {
        let mut scores = Vec::new();

        for worker in workers {
            let quota_used = quotas.usage(&worker.address);
            if quota_used >= self.max_quota {
                continue;
            }

            let default_stats = PerformanceSnapshot::default();
            let worker_stats = stats.get(&worker.address).unwrap_or(&default_stats);

            let suitability = self.suitability(worker, job);
            let performance = self.performance(worker_stats);
            let fairness = self.fairness(quota_used, worker_stats.is_newcomer);

            scores.push(WorkerScore {
                worker: worker.clone(),
                suitability,
                performance,
                fairness,
                total: suitability * performance * fairness,
            });
        }

        scores.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
        scores
    }
}
