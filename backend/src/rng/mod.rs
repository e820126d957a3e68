//! Deterministic random variate generation
//!
//! The engine only needs uniform(0,1) variates and derives exponential
//! inter-arrival and service times from them. Generators live behind the
//! [`UniformSource`] trait so the algorithm can be swapped without touching
//! the engine.
//!
//! CRITICAL: All randomness in the simulator MUST go through this module.

mod lehmer;
mod seeds;
mod xorshift;

pub use lehmer::LehmerRng;
pub use seeds::SeedSequence;
pub use xorshift::RngManager;

use serde::{Deserialize, Serialize};

/// Source of uniform variates in the open interval (0, 1).
///
/// Implementations must never return exactly 0.0 or 1.0, so that
/// [`UniformSource::exponential`] is always finite.
pub trait UniformSource: Send {
    /// Draw the next uniform variate in (0, 1), advancing the state.
    fn uniform(&mut self) -> f64;

    /// Replace the generator state with one derived from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Current internal state (for replay).
    fn state(&self) -> u64;

    /// Draw an exponential variate with the given mean.
    ///
    /// # Example
    /// ```
    /// use tandem_simulator_core_rs::rng::{RngManager, UniformSource};
    ///
    /// let mut rng = RngManager::new(12345);
    /// let service = rng.exponential(4.5);
    /// assert!(service > 0.0 && service.is_finite());
    /// ```
    fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.uniform().ln()
    }
}

/// Which generator algorithm a simulator uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// xorshift64* (default)
    #[default]
    Xorshift,

    /// Park–Miller minimal standard multiplicative congruential generator
    Lehmer,
}

impl GeneratorKind {
    /// Build a boxed generator of this kind seeded with `seed`.
    pub fn build(self, seed: u64) -> Box<dyn UniformSource> {
        match self {
            GeneratorKind::Xorshift => Box::new(RngManager::new(seed)),
            GeneratorKind::Lehmer => Box::new(LehmerRng::new(seed)),
        }
    }
}
