use crate::sampler::SelectionBranch;
use meridian_types::{JobRequest, WorkerAddress};
use serde::{Deserialize, Serialize};

/// One candidate as seen by the weighted draw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub worker: WorkerAddress,
    pub total: f64,
    pub probability: f64,
}

/// Audit record of a single selection decision.
///
/// Carries everything a third party needs to recompute the exploitation
/// draw: the seed, the pool with its probabilities, and the branch taken.
/// Exploration picks are labeled; their randomness is not publicly
/// reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionTrace {
    /// Derived id binding the trace to its VRF output and job descriptor
    pub selection_id: String,
    pub epoch: u64,
    pub started_at: i64,
    pub completed_at: i64,
    pub eligible_count: usize,
    pub branch: Option<SelectionBranch>,
    pub seed: Option<u32>,
    pub pool: Vec<CandidateRecord>,
    pub selected: Option<WorkerAddress>,
}

impl SelectionTrace {
    pub fn new(selection_id: String, epoch: u64) -> Self {
        Self {
            selection_id,
            epoch,
            started_at: chrono::Utc::now().timestamp_millis(),
            completed_at: 0,
            eligible_count: 0,
            branch: None,
            seed: None,
            pool: Vec::new(),
            selected: None,
        }
    }

    /// Bind a trace id to the VRF output and job descriptor
    pub fn derive_id(vrf_output: &[u8], job: &JobRequest) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(vrf_output);
        hasher.update(job.accelerator_model.as_bytes());
        hasher.update(&job.min_memory.to_be_bytes());
        if let Some(region) = &job.region {
            hasher.update(region.as_bytes());
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    pub fn record_ranked(&mut self, eligible_count: usize) {
        self.eligible_count = eligible_count;
    }

    pub fn record_draw(
        &mut self,
        branch: SelectionBranch,
        seed: u32,
        pool: Vec<CandidateRecord>,
    ) {
        self.branch = Some(branch);
        self.seed = Some(seed);
        self.pool = pool;
    }

    pub fn record_selected(&mut self, worker: WorkerAddress) {
        self.selected = Some(worker);
        self.completed_at = chrono::Utc::now().timestamp_millis();
    }

    pub fn record_unassignable(&mut self) {
        self.selected = None;
        self.completed_at = chrono::Utc::now().timestamp_millis();
    }

    pub fn short_id(&self) -> &str {
        &self.selection_id[..8.min(self.selection_id.len())]
    }

    pub fn duration_ms(&self) -> i64 {
        self.completed_at - self.started_at
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
