//! Deterministic random number generators.
//!
//! Every sketch derives its generators from the run seed plus a salt
//! naming what the randomness is for, so the same seed always produces the
//! same piece and two sketches never share a stream.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// Hash a run seed and a salt into a 32-byte RNG seed.
pub fn derive(seed: u64, salt: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(salt.as_bytes());
    hasher.finalize().into()
}

/// A `StdRng` for the given run seed and salt.
pub fn rng(seed: u64, salt: &str) -> StdRng {
    StdRng::from_seed(derive(seed, salt))
}
