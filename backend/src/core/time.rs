//! Simulation clock
//!
//! Time is continuous (`f64`) and only moves forward: the engine jumps the
//! clock to the due time of each event it processes.

use serde::{Deserialize, Serialize};

/// Monotonic continuous simulation clock
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0.0);
///
/// clock.advance_to(12.5).unwrap();
/// assert_eq!(clock.now(), 12.5);
///
/// // Moving backwards is rejected
/// assert!(clock.advance_to(3.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    now: f64,
}

/// Attempted to move the clock backwards
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("clock cannot move from {from} back to {to}")]
pub struct ClockRegression {
    pub from: f64,
    pub to: f64,
}

impl SimClock {
    /// Clock at time zero
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Current simulation time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Jump to `time`
    ///
    /// Staying at the same instant is allowed; going backwards is not.
    pub fn advance_to(&mut self, time: f64) -> Result<(), ClockRegression> {
        if time < self.now || time.is_nan() {
            return Err(ClockRegression {
                from: self.now,
                to: time,
            });
        }
        self.now = time;
        Ok(())
    }

    /// Return to time zero
    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}
