use serde::{Deserialize, Serialize};

/// Neutral prior substituted for any metric a worker has not yet earned.
///
/// Cold-start policy: unknown workers are neither penalized nor favored on
/// the performance axis.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Historical performance metrics for one worker, each in [0, 1].
///
/// A missing metric means "unknown", not zero; accessors resolve absent
/// values against [`NEUTRAL_PRIOR`] in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    /// Fraction of historical compute proofs that passed verification
    pub proof_pass_rate: Option<f64>,

    /// Data-availability reliability
    pub availability: Option<f64>,

    /// Uptime fraction over the observation window
    pub uptime: Option<f64>,

    /// Worker joined the network within the newcomer window
    pub is_newcomer: bool,
}

impl PerformanceSnapshot {
    pub fn new(proof_pass_rate: f64, availability: f64, uptime: f64) -> Self {
        Self {
            proof_pass_rate: Some(proof_pass_rate),
            availability: Some(availability),
            uptime: Some(uptime),
            is_newcomer: false,
        }
    }

    pub fn newcomer() -> Self {
        Self {
            is_newcomer: true,
            ..Default::default()
        }
    }

    pub fn proof_pass_rate_or_default(&self) -> f64 {
        self.proof_pass_rate.unwrap_or(NEUTRAL_PRIOR)
    }

    pub fn availability_or_default(&self) -> f64 {
        self.availability.unwrap_or(NEUTRAL_PRIOR)
    }

    pub fn uptime_or_default(&self) -> f64 {
        self.uptime.unwrap_or(NEUTRAL_PRIOR)
    }

    /// Fold an externally computed fraud-risk score in [0, 1] into the
    /// metrics before scoring.
    ///
    /// risk = 0 leaves the snapshot untouched; risk = 1 halves every metric.
    /// The scoring engine itself never reads a risk field; callers that
    /// consume a risk provider apply this before handing the snapshot over.
    pub fn with_risk(mut self, risk: f64) -> Self {
        let risk = risk.clamp(0.0, 1.0);
        let damp = 1.0 - risk / 2.0;
        self.proof_pass_rate = Some(self.proof_pass_rate_or_default() * damp);
        self.availability = Some(self.availability_or_default() * damp);
        self.uptime = Some(self.uptime_or_default() * damp);
        self
    }
}
