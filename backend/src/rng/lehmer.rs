//! Park–Miller "minimal standard" generator
//!
//! `x' = 16807 · x mod (2^31 − 1)`. The state never reaches 0 or the
//! modulus, so `x / m` lies strictly inside (0, 1).

use super::UniformSource;
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 16_807;
const MODULUS: u64 = 2_147_483_647;

/// Multiplicative congruential generator with modulus 2^31 − 1.
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::rng::LehmerRng;
///
/// let mut rng = LehmerRng::new(1);
/// assert_eq!(rng.next_state(), 16_807);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LehmerRng {
    state: u64,
}

impl LehmerRng {
    /// Create a generator from an arbitrary 64-bit seed.
    ///
    /// The seed is reduced into `[1, 2^31 − 2]`.
    pub fn new(seed: u64) -> Self {
        let reduced = seed % MODULUS;
        let state = if reduced == 0 { 1 } else { reduced };
        Self { state }
    }

    /// Advance and return the raw state.
    pub fn next_state(&mut self) -> u64 {
        // MULTIPLIER * state < 2^46, no overflow in u64
        self.state = (MULTIPLIER * self.state) % MODULUS;
        self.state
    }
}

impl UniformSource for LehmerRng {
    fn uniform(&mut self) -> f64 {
        self.next_state() as f64 / MODULUS as f64
    }

    fn reseed(&mut self, seed: u64) {
        *self = LehmerRng::new(seed);
    }

    fn state(&self) -> u64 {
        self.state
    }
}
