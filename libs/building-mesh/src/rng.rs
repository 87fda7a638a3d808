//! Deterministic random source for a batch.
//!
//! Every random choice (facade patterns, flat-roof UV rotation, rooftop
//! instances) draws from one `BuildRng` owned by the batch, so the same
//! seed and input always produce the same meshes.

use config::constants::DEFAULT_SEED;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 generator passed explicitly through the build.
#[derive(Debug, Clone)]
pub struct BuildRng(pub ChaCha8Rng);

impl Default for BuildRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl BuildRng {
    /// Create a new `BuildRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}
