use crate::config::SelectionConfig;
use crate::scoring::WorkerScore;
use meridian_types::{Result, SelectionError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Bytes of VRF output consumed for seeding the exploitation draw
pub const VRF_SEED_BYTES: usize = 4;

/// Which branch of the sampler produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionBranch {
    /// Uniform pick among all eligible workers, from non-VRF randomness
    Exploration,
    /// Score-proportional draw over the top-k pool, seeded by the VRF output
    Exploitation,
}

/// Result of one sampler draw, sufficient for a third party to recheck the
/// exploitation branch
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    /// Index of the selected worker in the ranked list
    pub index: usize,
    pub branch: SelectionBranch,
    /// Seed derived from the VRF output
    pub seed: u32,
    /// Size of the candidate pool the draw ran over
    pub pool_size: usize,
    /// Per-candidate probabilities over the exploitation pool; empty on the
    /// exploration branch
    pub probabilities: Vec<f64>,
}

/// Exploration/exploitation sampler over a ranked score list.
///
/// Holds no state across calls; the exploitation generator is freshly
/// seeded from the supplied VRF bytes on every draw, so identical inputs
/// reproduce identical outcomes.
#[derive(Debug)]
pub struct SelectionSampler {
    top_k: usize,
    exploration_rate: f64,
}

impl SelectionSampler {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            top_k: config.top_k,
            exploration_rate: config.exploration_rate,
        }
    }

    /// Interpret the first 4 bytes of a VRF output as a big-endian u32 seed.
    ///
    /// Shorter outputs are a caller contract violation.
    pub fn seed_from_vrf(vrf_output: &[u8]) -> Result<u32> {
        if vrf_output.len() < VRF_SEED_BYTES {
            return Err(SelectionError::MalformedVrfOutput {
                required: VRF_SEED_BYTES,
                actual: vrf_output.len(),
            });
        }

        let mut bytes = [0u8; VRF_SEED_BYTES];
        bytes.copy_from_slice(&vrf_output[..VRF_SEED_BYTES]);
        Ok(u32::from_be_bytes(bytes))
    }

    /// Draw one worker from the ranked list.
    ///
    /// `exploration_rng` feeds only the exploration gate and its uniform
    /// pick; it is deliberately independent of the VRF seed. The
    /// exploitation draw uses a generator scoped to this call, seeded from
    /// `vrf_output`, and never global generator state.
    pub fn sample<R: Rng>(
        &self,
        ranked: &[WorkerScore],
        vrf_output: &[u8],
        exploration_rng: &mut R,
    ) -> Result<Option<DrawOutcome>> {
        let seed = Self::seed_from_vrf(vrf_output)?;

        if ranked.is_empty() {
            return Ok(None);
        }

        if exploration_rng.gen::<f64>() < self.exploration_rate {
            let index = exploration_rng.gen_range(0..ranked.len());
            return Ok(Some(DrawOutcome {
                index,
                branch: SelectionBranch::Exploration,
                seed,
                pool_size: ranked.len(),
                probabilities: Vec::new(),
            }));
        }

        let pool_size = self.top_k.min(ranked.len());
        let pool = &ranked[..pool_size];

        let sum: f64 = pool.iter().map(|s| s.total).sum();
        let probabilities: Vec<f64> = if sum > 0.0 {
            pool.iter().map(|s| s.total / sum).collect()
        } else {
            // All eligible totals are zero: fall back to a uniform draw
            vec![1.0 / pool_size as f64; pool_size]
        };

        let mut rng = StdRng::seed_from_u64(seed as u64);
        let index = Self::categorical_draw(&probabilities, &mut rng);

        Ok(Some(DrawOutcome {
            index,
            branch: SelectionBranch::Exploitation,
            seed,
            pool_size,
            probabilities,
        }))
    }

    /// One categorical sample by cumulative scan over normalized
    /// probabilities
    fn categorical_draw<R: Rng>(probabilities: &[f64], rng: &mut R) -> usize {
        let r: f64 = rng.gen();
        let mut cumulative = 0.0;

        for (index, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if r < cumulative {
                return index;
            }
        }

        // Rounding left the cumulative sum a hair under 1.0
        probabilities.len() - 1
    }
}
