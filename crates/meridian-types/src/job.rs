use serde::{Deserialize, Serialize};

/// Hardware requirements of a submitted compute job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Required accelerator model; empty string means any model is acceptable
    pub accelerator_model: String,

    /// Minimum accelerator memory in GB
    pub min_memory: u64,

    /// Preferred region; None means no preference
    pub region: Option<String>,
}

impl JobRequest {
    pub fn new(accelerator_model: impl Into<String>, min_memory: u64) -> Self {
        Self {
            accelerator_model: accelerator_model.into(),
            min_memory,
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Whether the job pins a specific accelerator model
    pub fn requires_accelerator(&self) -> bool {
        !self.accelerator_model.is_empty()
    }
}
