//! Seedable randomness for card sampling, option selection and OTP
//! generation. Handlers draw a fresh entropy-seeded generator per request;
//! tests pass a fixed seed and assert exact outcomes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub type SampleRng = ChaCha8Rng;

/// Entropy-seeded generator for production call sites.
pub fn from_entropy() -> SampleRng {
    ChaCha8Rng::from_entropy()
}

/// Deterministic generator; same seed, same sequence.
pub fn seeded(seed: u64) -> SampleRng {
    ChaCha8Rng::seed_from_u64(seed)
}
