//! Per-replication seed derivation
//!
//! Every replication starts from its own seed. With a master seed the
//! sequence is reproducible; without one, each seed comes from fresh
//! OS entropy.

use super::RngManager;
use uuid::Uuid;

/// Yields one seed per replication.
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::rng::SeedSequence;
///
/// let a: Vec<u64> = SeedSequence::new(Some(42)).take(3).collect();
/// let b: Vec<u64> = SeedSequence::new(Some(42)).take(3).collect();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub enum SeedSequence {
    /// Seeds drawn from a master xorshift stream
    Deterministic(RngManager),

    /// Seeds drawn from random v4 UUIDs
    Entropy,
}

impl SeedSequence {
    pub fn new(master_seed: Option<u64>) -> Self {
        match master_seed {
            Some(seed) => SeedSequence::Deterministic(RngManager::new(seed)),
            None => SeedSequence::Entropy,
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        match self {
            SeedSequence::Deterministic(master) => master.next(),
            SeedSequence::Entropy => {
                let bits = Uuid::new_v4().as_u128();
                (bits >> 64) as u64 ^ bits as u64
            }
        }
    }
}

impl Iterator for SeedSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_seed())
    }
}
