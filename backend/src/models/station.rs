//! Service stations and their busy-clocks
//!
//! Each station is a single server. A job's service starts at
//! `max(arrival at station, busy_until)` and the station stays busy until
//! that service ends.

use serde::{Deserialize, Serialize};

/// One of the three serial stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    /// Shared first stage
    First,
    /// Second stage
    Second,
    /// Capacity-bounded third stage
    Third,
}

impl Station {
    pub const ALL: [Station; 3] = [Station::First, Station::Second, Station::Third];

    pub fn index(self) -> usize {
        match self {
            Station::First => 0,
            Station::Second => 1,
            Station::Third => 2,
        }
    }
}

/// Busy-clock and service history for a single station
///
/// # Example
/// ```
/// use tandem_simulator_core_rs::StationClock;
///
/// let mut station = StationClock::default();
///
/// // Idle station: service starts on arrival
/// assert_eq!(station.serve(10.0, 4.0), 14.0);
///
/// // Busy station: the next job waits until 14.0
/// assert_eq!(station.serve(12.0, 1.0), 15.0);
/// assert_eq!(station.history(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationClock {
    /// Time at which the station can start its next service
    busy_until: f64,

    /// Total service time consumed
    history: f64,
}

impl StationClock {
    /// Serve a job arriving at `arrival` for `service` time units
    ///
    /// Returns the completion time.
    pub fn serve(&mut self, arrival: f64, service: f64) -> f64 {
        let start = arrival.max(self.busy_until);
        let completes_at = start + service;
        self.busy_until = completes_at;
        self.history += service;
        completes_at
    }

    /// Drop service scheduled past `clock` from the history
    ///
    /// Every scheduled service arrived at or before `clock`, so the station
    /// is continuously busy over `[clock, busy_until]` and that whole span
    /// is unfinished work.
    pub fn close_at(&mut self, clock: f64) {
        let unfinished = (self.busy_until - clock).max(0.0);
        self.history = (self.history - unfinished).max(0.0);
        self.busy_until = self.busy_until.min(clock);
    }

    pub fn busy_until(&self) -> f64 {
        self.busy_until
    }

    pub fn history(&self) -> f64 {
        self.history
    }
}
