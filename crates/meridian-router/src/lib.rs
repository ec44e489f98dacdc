pub mod config;
pub mod router;
pub mod sampler;
pub mod scoring;
pub mod trace;

pub use config::SelectionConfig;
pub use router::AutoSelectionRouter;
pub use sampler::{DrawOutcome, SelectionBranch, SelectionSampler};
pub use scoring::{ScoringEngine, WorkerScore};
pub use trace::{CandidateRecord, SelectionTrace};

pub use meridian_types::{Result, SelectionError};
