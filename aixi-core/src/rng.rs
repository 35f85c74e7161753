//! Single seeded random stream shared by the agent, the planner, and the
//! sample environments.
//!
//! Every component that samples (percept generation, UCB tie-breaks, the
//! playout policy, environment chance) draws from one explicitly seeded
//! stream, so fixing the seed fixes the whole trajectory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct AgentRng {
    rng: ChaCha8Rng,
}

impl AgentRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform sample from `[0, 1)`.
    pub fn r01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer sample from `[0, end)`.
    ///
    /// # Panics
    /// Panics if `end == 0`.
    pub fn rand_range(&mut self, end: u32) -> u32 {
        assert!(end > 0, "rand_range over an empty range");
        self.rng.gen_range(0..end)
    }
}
