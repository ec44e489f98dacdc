use meridian_types::{Result, SelectionError};
use serde::{Deserialize, Serialize};

/// Router configuration
///
/// Validated once at router construction; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Number of top-ranked candidates eligible for the weighted draw
    pub top_k: usize,

    /// Maximum fraction of epoch capacity a single worker may consume
    pub max_quota: f64,

    /// Probability of bypassing the leaderboard and picking uniformly
    /// among all eligible workers
    pub exploration_rate: f64,

    /// Additive fairness bonus for workers new to the network
    pub newcomer_boost: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_k: 64,
            max_quota: 0.125,
            exploration_rate: 0.05,
            newcomer_boost: 0.1,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(SelectionError::InvalidConfiguration(
                "top_k must be positive".to_string(),
            ));
        }

        if !(self.max_quota > 0.0 && self.max_quota <= 1.0) {
            return Err(SelectionError::InvalidConfiguration(format!(
                "max_quota must be in (0, 1], got {}",
                self.max_quota
            )));
        }

        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(SelectionError::InvalidConfiguration(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            )));
        }

        if !(self.newcomer_boost >= 0.0) {
            return Err(SelectionError::InvalidConfiguration(format!(
                "newcomer_boost must be non-negative, got {}",
                self.newcomer_boost
            )));
        }

        Ok(())
    }
}
