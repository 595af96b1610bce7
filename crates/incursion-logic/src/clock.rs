//! Simulation clock with a clamped frame delta.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    max_dt: f64,
    elapsed: f64,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            max_dt,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    /// Clamp `raw_dt` into `[0, max_dt]` and advance. NaN and negative
    /// deltas count as zero.
    pub fn advance(&mut self, raw_dt: f64) -> f64 {
        let dt = if raw_dt.is_nan() || raw_dt < 0.0 {
            0.0
        } else {
            raw_dt.min(self.max_dt)
        };
        self.elapsed += dt;
        self.ticks += 1;
        dt
    }

    /// Total clamped simulation time.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }
}
