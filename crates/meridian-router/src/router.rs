use crate::config::SelectionConfig;
use crate::sampler::{SelectionBranch, SelectionSampler, VRF_SEED_BYTES};
use crate::scoring::{ScoringEngine, WorkerScore};
use crate::trace::{CandidateRecord, SelectionTrace};
use meridian_types::{
    JobRequest, PerformanceSnapshot, QuotaSnapshot, Result, WorkerAddress, WorkerProfile,
};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Auto Selection Router: one job in, one worker (or none) out.
///
/// Orchestrates scoring and sampling over caller-supplied snapshots. Holds
/// no mutable state: quota accounting stays with the caller, which commits
/// the winner's capacity cost and resets the ledger at epoch rollover.
#[derive(Debug)]
pub struct AutoSelectionRouter {
    config: SelectionConfig,
    scoring: ScoringEngine,
    sampler: SelectionSampler,
    // Metrics
    pub selections_total: Option<Arc<prometheus::IntCounter>>,
    pub selection_duration: Option<Arc<prometheus::Histogram>>,
    pub candidate_pool_size: Option<Arc<prometheus::IntGauge>>,
}

impl AutoSelectionRouter {
    /// Build a router from a validated configuration.
    ///
    /// Invalid configuration fails here, never per call.
    pub fn new(config: SelectionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scoring: ScoringEngine::new(&config),
            sampler: SelectionSampler::new(&config),
            config,
            selections_total: None,
            selection_duration: None,
            candidate_pool_size: None,
        })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Set metrics for selection tracking
    pub fn set_metrics(
        &mut self,
        selections_total: Arc<prometheus::IntCounter>,
        selection_duration: Arc<prometheus::Histogram>,
        candidate_pool_size: Arc<prometheus::IntGauge>,
    ) {
        self.selections_total = Some(selections_total);
        self.selection_duration = Some(selection_duration);
        self.candidate_pool_size = Some(candidate_pool_size);
    }

    /// Score and rank every quota-eligible worker for a job
    pub fn score_workers(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
    ) -> Vec<WorkerScore> {
        self.scoring.score_workers(workers, job, stats, quotas)
    }

    /// Select one worker for a job.
    ///
    /// `Ok(None)` means no worker is eligible this cycle; callers requeue
    /// the job for the next epoch or tick. The exploration gate draws from
    /// the thread-local generator; use
    /// [`select_with_rng`](AutoSelectionRouter::select_with_rng) to supply
    /// that entropy explicitly.
    pub fn select(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
        vrf_output: &[u8],
    ) -> Result<Option<WorkerProfile>> {
        let mut rng = rand::thread_rng();
        self.select_with_rng(workers, job, stats, quotas, vrf_output, &mut rng)
    }

    /// [`select`](AutoSelectionRouter::select) with caller-supplied
    /// exploration entropy
    pub fn select_with_rng<R: Rng>(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
        vrf_output: &[u8],
        exploration_rng: &mut R,
    ) -> Result<Option<WorkerProfile>> {
        let (selected, _) =
            self.select_traced_with_rng(workers, job, stats, quotas, vrf_output, exploration_rng)?;
        Ok(selected)
    }

    /// [`select`](AutoSelectionRouter::select), also returning the audit
    /// trace of the decision
    pub fn select_traced(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
        vrf_output: &[u8],
    ) -> Result<(Option<WorkerProfile>, SelectionTrace)> {
        let mut rng = rand::thread_rng();
        self.select_traced_with_rng(workers, job, stats, quotas, vrf_output, &mut rng)
    }

    pub fn select_traced_with_rng<R: Rng>(
        &self,
        workers: &[WorkerProfile],
        job: &JobRequest,
        stats: &HashMap<WorkerAddress, PerformanceSnapshot>,
        quotas: &QuotaSnapshot,
        vrf_output: &[u8],
        exploration_rng: &mut R,
    ) -> Result<(Option<WorkerProfile>, SelectionTrace)> {
        let start = std::time::Instant::now();

        // Caller contract: at least 4 bytes of VRF output, checked before
        // any scoring work
        SelectionSampler::seed_from_vrf(vrf_output)?;

        if let Some(ref counter) = self.selections_total {
            counter.inc();
        }

        let mut trace =
            SelectionTrace::new(SelectionTrace::derive_id(vrf_output, job), quotas.epoch);

        let ranked = self.scoring.score_workers(workers, job, stats, quotas);
        trace.record_ranked(ranked.len());

        debug!(
            selection_id = trace.short_id(),
            epoch = quotas.epoch,
            roster = workers.len(),
            eligible = ranked.len(),
            vrf_prefix = %hex::encode(&vrf_output[..VRF_SEED_BYTES]),
            "Scored workers for job"
        );

        let outcome = self.sampler.sample(&ranked, vrf_output, exploration_rng)?;

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => {
                trace.record_unassignable();
                if let Some(ref histogram) = self.selection_duration {
                    histogram.observe(start.elapsed().as_secs_f64());
                }
                debug!(
                    selection_id = trace.short_id(),
                    epoch = quotas.epoch,
                    "No eligible worker, job unassignable this cycle"
                );
                return Ok((None, trace));
            }
        };

        let pool_records = match outcome.branch {
            SelectionBranch::Exploitation => ranked[..outcome.pool_size]
                .iter()
                .zip(&outcome.probabilities)
                .map(|(score, probability)| CandidateRecord {
                    worker: score.worker.address.clone(),
                    total: score.total,
                    probability: *probability,
                })
                .collect(),
            SelectionBranch::Exploration => Vec::new(),
        };
        trace.record_draw(outcome.branch, outcome.seed, pool_records);

        let winner = &ranked[outcome.index];
        trace.record_selected(winner.worker.address.clone());

        if let Some(ref gauge) = self.candidate_pool_size {
            gauge.set(outcome.pool_size as i64);
        }
        if let Some(ref histogram) = self.selection_duration {
            histogram.observe(start.elapsed().as_secs_f64());
        }

        info!(
            selection_id = trace.short_id(),
            epoch = quotas.epoch,
            worker = %winner.worker.address,
            branch = ?outcome.branch,
            total_score = winner.total,
            eligible = ranked.len(),
            pool = outcome.pool_size,
            duration_ms = start.elapsed().as_millis() as u64,
            "🎯 Worker selected for job"
        );

        Ok((Some(winner.worker.clone()), trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::SelectionError;

    fn worker(address: &str, model: &str, memory: u64, region: &str) -> WorkerProfile {
        WorkerProfile {
            address: WorkerAddress::from(address),
            accelerator_model: model.to_string(),
            memory_capacity: memory,
            core_count: 16,
            system_memory: 64,
            region: region.to_string(),
        }
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let err = AutoSelectionRouter::new(SelectionConfig {
            top_k: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, SelectionError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_malformed_vrf_rejected() {
        let router = AutoSelectionRouter::new(SelectionConfig::default()).unwrap();
        let workers = vec![worker("0x1111", "NVIDIA RTX 4090", 24, "us-west")];
        let job = JobRequest::new("", 8);

        let err = router
            .select(&workers, &job, &HashMap::new(), &QuotaSnapshot::new(0), &[1, 2])
            .unwrap_err();
        assert!(matches!(err, SelectionError::MalformedVrfOutput { .. }));
    }

    #[test]
    fn test_empty_roster_is_unassignable_not_an_error() {
        let router = AutoSelectionRouter::new(SelectionConfig::default()).unwrap();
        let job = JobRequest::new("", 8);

        let (selected, trace) = router
            .select_traced(&[], &job, &HashMap::new(), &QuotaSnapshot::new(0), &[0u8; 32])
            .unwrap();
        assert!(selected.is_none());
        assert_eq!(trace.eligible_count, 0);
        assert!(trace.branch.is_none());
    }

    #[test]
    fn test_selects_a_worker_from_roster() {
        let router = AutoSelectionRouter::new(SelectionConfig {
            exploration_rate: 0.0,
            ..Default::default()
        })
        .unwrap();
        let workers = vec![
            worker("0x1111", "NVIDIA RTX 4090", 24, "us-west"),
            worker("0x2222", "NVIDIA A100", 80, "us-east"),
        ];
        let job = JobRequest::new("", 8);

        let (selected, trace) = router
            .select_traced(&workers, &job, &HashMap::new(), &QuotaSnapshot::new(0), &[9u8; 32])
            .unwrap();

        let selected = selected.unwrap();
        assert!(workers.iter().any(|w| w.address == selected.address));
        assert_eq!(trace.branch, Some(SelectionBranch::Exploitation));
        assert_eq!(trace.selected, Some(selected.address));
        assert_eq!(trace.pool.len(), 2);
    }
}
