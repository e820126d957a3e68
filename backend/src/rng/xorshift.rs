//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Debugging (reproduce exact replication)
//! - Testing (verify behavior)
//! - Validation against analytic results

use super::UniformSource;
use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let u = rng.next_open_f64(); // (0, 1)
/// assert!(u > 0.0 && u < 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Example
    /// ```
    /// use tandem_simulator_core_rs::RngManager;
    ///
    /// let rng = RngManager::new(12345);
    /// ```
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    ///
    /// This advances the internal state and returns a random value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random f64 in the open range (0.0, 1.0)
    ///
    /// Uses the top 52 bits and centres the value inside its bucket, so
    /// neither endpoint is reachable. `ln()` of the result is always finite.
    ///
    /// # Example
    /// ```
    /// use tandem_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let u = rng.next_open_f64();
    /// assert!(u > 0.0 && u < 1.0);
    /// ```
    pub fn next_open_f64(&mut self) -> f64 {
        let value = self.next();
        ((value >> 12) as f64 + 0.5) * (1.0 / ((1u64 << 52) as f64))
    }
}

impl UniformSource for RngManager {
    fn uniform(&mut self) -> f64 {
        self.next_open_f64()
    }

    fn reseed(&mut self, seed: u64) {
        *self = RngManager::new(seed);
    }

    /// Current state; `RngManager::new(state)` resumes the stream
    fn state(&self) -> u64 {
        self.state
    }
}
